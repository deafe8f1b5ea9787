use rust_decimal::Decimal;

use candela_core::{CandelaError, SymbolId};

/// Contract shapes this connector understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractKind {
    /// A USDT-margined perpetual swap with no expiry.
    LinearPerpetual,
}

/// Locally-constructed market description for one contract.
///
/// The futures endpoint normally requires a full market-catalog download
/// before any data call; that call is slow and rate-limited. Since this
/// connector serves exactly one contract shape, the description is built
/// here from the symbol instead, and construction rejects anything outside
/// that shape up front. The native id is always derived as `{base}{quote}`,
/// which is the identifier the kline route resolves against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractSpec {
    base: String,
    quote: String,
    market_id: String,
    kind: ContractKind,
    price_precision: u32,
    amount_precision: u32,
    min_notional: Decimal,
}

impl ContractSpec {
    /// The only quote asset that trades as a linear perpetual here.
    pub const QUOTE: &'static str = "USDT";

    /// Build the spec for a linear perpetual on the given pair.
    ///
    /// # Errors
    /// Returns [`CandelaError::UnsupportedContract`] for bare security
    /// codes and for any quote other than [`Self::QUOTE`]. Failing loudly
    /// here beats routing a request the endpoint would misinterpret.
    pub fn linear_perpetual(symbol: &SymbolId) -> Result<Self, CandelaError> {
        let SymbolId::Pair { base, quote } = symbol else {
            return Err(CandelaError::unsupported_contract(format!(
                "{symbol}: only base/quote pairs trade as perpetual contracts"
            )));
        };
        if quote != Self::QUOTE {
            return Err(CandelaError::unsupported_contract(format!(
                "{symbol}: only {}-margined linear perpetuals are supported",
                Self::QUOTE
            )));
        }
        Ok(Self {
            base: base.clone(),
            quote: quote.clone(),
            market_id: format!("{base}{quote}"),
            kind: ContractKind::LinearPerpetual,
            price_precision: 2,
            amount_precision: 3,
            min_notional: Decimal::new(5, 0),
        })
    }

    /// Provider-native identifier (e.g. `BTCUSDT`).
    #[must_use]
    pub fn market_id(&self) -> &str {
        &self.market_id
    }

    /// Base asset ticker.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Quote asset ticker.
    #[must_use]
    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// Contract kind.
    #[must_use]
    pub const fn kind(&self) -> ContractKind {
        self.kind
    }

    /// Price tick precision, in decimal places.
    #[must_use]
    pub const fn price_precision(&self) -> u32 {
        self.price_precision
    }

    /// Order amount precision, in decimal places.
    #[must_use]
    pub const fn amount_precision(&self) -> u32 {
        self.amount_precision
    }

    /// Minimum order notional in the quote asset.
    #[must_use]
    pub const fn min_notional(&self) -> Decimal {
        self.min_notional
    }
}
