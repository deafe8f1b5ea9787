use std::sync::Arc;

use candela_core::{CandelaError, Series, SeriesRequest, SymbolId, Timeframe};

use crate::cache::CacheKey;
use crate::core::Candela;

impl Candela {
    /// Retrieve a normalized OHLCV series for a free-form symbol input.
    ///
    /// Checks the result cache first; on a miss, runs the retrieval
    /// sequence: the primary source, then (when fallback is enabled and the
    /// primary's failure kind allows it) the fallback source. The returned
    /// series is an immutable snapshot tagged with the source that answered.
    ///
    /// # Errors
    /// - [`CandelaError::SymbolNotFound`] / [`CandelaError::InvalidArg`] for
    ///   unusable input.
    /// - The primary's error when fallback is disabled or not warranted.
    /// - [`CandelaError::AllSourcesFailed`] carrying both sources' errors
    ///   when the fallback also failed.
    pub async fn get_series(
        &self,
        symbol_input: &str,
        timeframe: Timeframe,
        lookback_days: u32,
    ) -> Result<Arc<Series>, CandelaError> {
        if lookback_days == 0 {
            return Err(CandelaError::InvalidArg(
                "lookback must be at least one day".to_string(),
            ));
        }
        let symbol = SymbolId::parse(symbol_input)?;
        let req = SeriesRequest {
            symbol,
            timeframe,
            lookback_days,
        };

        let key = CacheKey::new(&req, self.cfg.use_fallback);
        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!(symbol = %req.symbol, %timeframe, "serving series from cache");
            return Ok(hit);
        }

        let series = Arc::new(self.fetch_uncached(&req).await?);
        self.cache.insert(key, series.clone()).await;
        Ok(series)
    }

    /// The per-request fallback state machine: trying-primary, then at most
    /// one hop to trying-secondary. Never loops back to the primary.
    async fn fetch_uncached(&self, req: &SeriesRequest) -> Result<Series, CandelaError> {
        tracing::debug!(
            symbol = %req.symbol,
            timeframe = %req.timeframe,
            source = self.primary.name(),
            "trying primary source"
        );
        let primary_err = match Self::source_call_with_timeout(
            self.primary.name(),
            self.cfg.provider_timeout,
            self.primary.fetch_series(req),
        )
        .await
        {
            Ok(series) => return Ok(series),
            Err(e) => e,
        };

        if !self.cfg.use_fallback || !primary_err.triggers_fallback() {
            tracing::error!(
                source = self.primary.name(),
                error = %primary_err,
                "primary source failed terminally"
            );
            return Err(primary_err);
        }
        let Some(secondary) = &self.secondary else {
            tracing::error!(
                source = self.primary.name(),
                error = %primary_err,
                "primary source failed and no fallback is registered"
            );
            return Err(primary_err);
        };

        tracing::warn!(
            primary = self.primary.name(),
            secondary = secondary.name(),
            error = %primary_err,
            "primary source failed, trying fallback"
        );
        match Self::source_call_with_timeout(
            secondary.name(),
            self.cfg.provider_timeout,
            secondary.fetch_series(req),
        )
        .await
        {
            Ok(mut series) => {
                series.fallback_note = Some(format!(
                    "{} unavailable ({primary_err}); data served by {}",
                    self.primary.name(),
                    secondary.name()
                ));
                Ok(series)
            }
            Err(secondary_err) => {
                tracing::error!(
                    primary = self.primary.name(),
                    secondary = secondary.name(),
                    primary_error = %primary_err,
                    secondary_error = %secondary_err,
                    "all sources failed"
                );
                Err(CandelaError::AllSourcesFailed(vec![
                    primary_err,
                    secondary_err,
                ]))
            }
        }
    }
}
