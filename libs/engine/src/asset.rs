//! Asset marker types.
//!
//! Assets are zero-sized type tags, so a `Balance<SUI>` can never be joined
//! into a `Balance<USDC>`; the compiler is the custodian. Concrete assets
//! are declared where they are used; the engine itself only fixes the one
//! token its own surface depends on.

/// A coin type. `TYPE_NAME` is the fully qualified on-chain type.
pub trait Asset: 'static {
    const TYPE_NAME: &'static str;
}

/// DeepBook's fee token; every order-book leg pays taker fees in it.
pub struct DEEP;

impl Asset for DEEP {
    const TYPE_NAME: &'static str =
        "0xdeeb7a4662eec9f2f3def03fb937a663dddaa2e215b8078a284d026b7946c270::deep::DEEP";
}
