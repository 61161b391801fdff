//! Startup errors: configuration, pool construction.
//!
//! Request-time failures live in [`crate::types::ApiError`]; this chain only
//! covers what can go wrong before Rocket starts serving.

error_chain! {
    foreign_links {
        Var(::std::env::VarError);
        ParseInt(::std::num::ParseIntError);
        R2D2(::r2d2::Error);
    }

    errors {
        InvalidSetting(name: &'static str, value: String) {
            description("invalid configuration value")
            display("invalid value for {}: {:?}", name, value)
        }
    }
}
