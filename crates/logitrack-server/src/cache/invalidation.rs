//! Cache invalidation with pattern matching support.

use glob::Pattern;
use tracing::{debug, info};

use crate::cache::keys::{CacheKey, ITEM_SEARCH_PATTERN};
use crate::cache::layer::CacheLayer;

/// Resultado de una operación de invalidación.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvalidationResult {
    /// Número de entries invalidadas (para patrones, las que el backend reporto).
    pub count: usize,
    /// Keys y patrones aplicados.
    pub patterns: Vec<String>,
}

impl InvalidationResult {
    fn merge(&mut self, other: InvalidationResult) {
        self.count += other.count;
        self.patterns.extend(other.patterns);
    }
}

impl CacheLayer {
    /// Invalida un conjunto de keys exactas.
    pub async fn invalidate_many<'a, I>(&self, keys: I) -> InvalidationResult
    where
        I: IntoIterator<Item = &'a CacheKey>,
    {
        let mut result = InvalidationResult::default();
        for key in keys {
            self.invalidate(key).await;
            result.count += 1;
            result.patterns.push(key.to_string());
        }
        result
    }

    /// Invalida entradas usando un patrón glob.
    ///
    /// - `*`: coincide con cualquier secuencia de caracteres
    /// - `?`: coincide con un carácter
    ///
    /// Un patrón inválido no invalida nada. Los fallos del backend se
    /// registran y se tratan como cero entries invalidadas.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use std::sync::Arc;
    /// # use logitrack_server::cache::{CacheLayer, CachePolicies, MemoryCacheBackend};
    /// # #[tokio::main]
    /// # async fn main() {
    /// # let cache = CacheLayer::new(Arc::new(MemoryCacheBackend::with_defaults()), CachePolicies::default());
    /// // Invalida todas las busquedas de items
    /// let result = cache.invalidate_matching("inventory_items_search_*").await;
    /// println!("Invalidated {} entries", result.count);
    /// # }
    /// ```
    pub async fn invalidate_matching(&self, pattern_str: &str) -> InvalidationResult {
        let mut result = InvalidationResult {
            count: 0,
            patterns: vec![pattern_str.to_string()],
        };

        if let Err(e) = Pattern::new(pattern_str) {
            debug!(pattern = %pattern_str, error = %e, "Invalid glob pattern");
            return result;
        }

        match self.backend().remove_matching(pattern_str).await {
            Ok(count) => {
                result.count = count;
                if count > 0 {
                    info!(pattern = %pattern_str, count, "Cache entries invalidated by pattern");
                }
            },
            Err(e) => {
                self.metrics()
                    .record_error(self.backend_name(), e.kind());
                tracing::warn!(
                    pattern = %pattern_str,
                    backend = self.backend_name(),
                    error = %e,
                    "Pattern invalidation failed"
                );
            },
        }

        result
    }

    /// Invalida todos los resultados de busqueda de items.
    pub async fn invalidate_item_searches(&self) -> InvalidationResult {
        self.invalidate_matching(ITEM_SEARCH_PATTERN).await
    }

    /// Invalida las vistas derivadas de la tabla de items: la coleccion
    /// completa y todas las busquedas.
    pub async fn invalidate_item_views(&self) -> InvalidationResult {
        let mut result = self.invalidate_many([&CacheKey::all_items()]).await;
        result.merge(self.invalidate_item_searches().await);
        result
    }
}
