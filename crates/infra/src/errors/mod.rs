//! Infrastructure error conversions

pub(crate) mod conversions;

pub(crate) use conversions::IntoApiError;
