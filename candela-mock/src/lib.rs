use async_trait::async_trait;

use candela_core::provider::{SeriesProvider, SourceKey};
use candela_core::{CandelaError, Series, SeriesRequest, SymbolId, Timeframe};

mod fixtures;

/// Instruction for how a mock provider should answer `fetch_series`.
pub enum MockBehavior {
    /// Serve deterministic fixture bars for the request.
    Serve,
    /// Fail immediately with the provided error.
    Fail(CandelaError),
    /// Never resolve (simulate a stalled provider; orchestrators time out).
    Hang,
}

/// Mock series provider for CI-safe tests and examples.
pub struct MockProvider {
    name: &'static str,
    behavior: MockBehavior,
}

impl MockProvider {
    /// A provider that always serves fixture data.
    #[must_use]
    pub const fn serving(name: &'static str) -> Self {
        Self {
            name,
            behavior: MockBehavior::Serve,
        }
    }

    /// A provider that always fails with `err`.
    #[must_use]
    pub const fn failing(name: &'static str, err: CandelaError) -> Self {
        Self {
            name,
            behavior: MockBehavior::Fail(err),
        }
    }

    /// A provider whose calls never complete.
    #[must_use]
    pub const fn hanging(name: &'static str) -> Self {
        Self {
            name,
            behavior: MockBehavior::Hang,
        }
    }
}

#[async_trait]
impl SeriesProvider for MockProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn supports_symbol(&self, _symbol: &SymbolId) -> bool {
        true
    }

    fn supported_timeframes(&self) -> &'static [Timeframe] {
        &[Timeframe::H1, Timeframe::H4, Timeframe::D1]
    }

    async fn fetch_series(&self, req: &SeriesRequest) -> Result<Series, CandelaError> {
        match &self.behavior {
            MockBehavior::Serve => Ok(fixtures::series(req, SourceKey::new(self.name))),
            MockBehavior::Fail(err) => Err(err.clone()),
            MockBehavior::Hang => {
                std::future::pending::<()>().await;
                unreachable!("pending future resolved")
            }
        }
    }
}
