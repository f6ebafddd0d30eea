//! Typed routes: one variant per resource, carrying exactly that resource's
//! path parameters.
//!
//! ```rust,ignore
//! let url = builder.route(&Route::Block { id: BlockId::Height(1_234_567) }, &QueryParams::new())?;
//! ```

use crate::resources::ResourceName;
use crate::template::PathParams;

/// A block, addressed by height or by hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockId<'a> {
    Height(u64),
    Hash(&'a str),
}

impl BlockId<'_> {
    fn to_path_value(self) -> String {
        match self {
            BlockId::Height(h) => h.to_string(),
            BlockId::Hash(hash) => hash.to_string(),
        }
    }
}

/// A resource together with its path parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    HomepageStats,
    HomepageBlocks,
    Blocks,
    Block { id: BlockId<'a> },
    BlockTxs { id: BlockId<'a> },
    TxsValidated,
    Tx { hash: &'a str },
    Validators,
    Address { hash: &'a str },
    AddressTxs { hash: &'a str },
    AddressTokens { hash: &'a str, kind: Option<&'a str> },
    Contract { hash: &'a str },
    Search,
    Health,
    JsonRpc,
}

impl Route<'_> {
    pub fn name(&self) -> ResourceName {
        match self {
            Route::HomepageStats => ResourceName::HomepageStats,
            Route::HomepageBlocks => ResourceName::HomepageBlocks,
            Route::Blocks => ResourceName::Blocks,
            Route::Block { .. } => ResourceName::Block,
            Route::BlockTxs { .. } => ResourceName::BlockTxs,
            Route::TxsValidated => ResourceName::TxsValidated,
            Route::Tx { .. } => ResourceName::Tx,
            Route::Validators => ResourceName::Validators,
            Route::Address { .. } => ResourceName::Address,
            Route::AddressTxs { .. } => ResourceName::AddressTxs,
            Route::AddressTokens { .. } => ResourceName::AddressTokens,
            Route::Contract { .. } => ResourceName::Contract,
            Route::Search => ResourceName::Search,
            Route::Health => ResourceName::Health,
            Route::JsonRpc => ResourceName::JsonRpc,
        }
    }

    /// Path parameters keyed by the placeholder names of [`Route::name`]'s template.
    pub fn params(&self) -> PathParams {
        match *self {
            Route::Block { id } | Route::BlockTxs { id } => {
                PathParams::new().with("height_or_hash", id.to_path_value())
            }
            Route::Tx { hash }
            | Route::Address { hash }
            | Route::AddressTxs { hash }
            | Route::Contract { hash } => PathParams::new().with("hash", hash),
            Route::AddressTokens { hash, kind } => {
                let mut params = PathParams::new().with("hash", hash);
                if let Some(kind) = kind {
                    params.insert("kind", kind);
                }
                params
            }
            Route::HomepageStats
            | Route::HomepageBlocks
            | Route::Blocks
            | Route::TxsValidated
            | Route::Validators
            | Route::Search
            | Route::Health
            | Route::JsonRpc => PathParams::new(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
