//! Conversions from other error and data libraries into [`Value`].
//!
//! - [`anyhow1`] renders [`anyhow::Error`] chains as error values (requires
//!   the `compat-anyhow1` feature flag)
//! - [`serde_json1`] converts JSON documents into values (requires the `serde`
//!   feature flag)
//!
//! [`Value`]: crate::value::Value

#[cfg(feature = "compat-anyhow1")]
#[cfg_attr(docsrs, doc(cfg(feature = "compat-anyhow1")))]
pub mod anyhow1;
#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
pub mod serde_json1;
