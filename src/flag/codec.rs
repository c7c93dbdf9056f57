//! Value/complement pair encoding

/// A byte stored together with its complement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedundantFlag {
    pub value: u8,
    pub complement: u8,
}

impl RedundantFlag {
    /// Build a pair from raw bytes read back from the store
    pub fn from_parts(value: u8, complement: u8) -> Self {
        Self { value, complement }
    }

    pub fn is_valid(&self) -> bool {
        validate(*self)
    }
}

/// Pair `value` with its bitwise complement
pub fn encode(value: u8) -> RedundantFlag {
    RedundantFlag {
        value,
        complement: !value,
    }
}

/// True iff the complement still matches the value
pub fn validate(flag: RedundantFlag) -> bool {
    flag.value == !flag.complement
}
