//! User-facing notices emitted by cart operations.

use serde::{Deserialize, Serialize};

/// A fire-and-forget message for the shopper.
///
/// Notices carry no structured payload; they exist only to be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// The requested quantity exceeds the available stock.
    OutOfStock,
    /// Adding a product failed.
    AddFailed,
    /// Removing a product failed.
    RemoveFailed,
    /// Changing a line item quantity failed.
    UpdateFailed,
}

impl Notice {
    /// Display message for the notice.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::OutOfStock => "Requested quantity out of stock",
            Self::AddFailed => "Failed to add product",
            Self::RemoveFailed => "Failed to remove product",
            Self::UpdateFailed => "Failed to update product quantity",
        }
    }

    /// Whether the notice reports a business rule rather than a fault.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::OutOfStock)
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
