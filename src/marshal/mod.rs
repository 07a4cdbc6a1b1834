//! Marshaling between in-memory contacts and the native wire format.

pub mod dates;
pub mod payload;

pub use dates::{
    coerce_to_date, convert_dates_in, convert_dates_out, normalize_updated_since,
    parse_float_prefix,
};
pub use payload::{create_from_properties, decode_batch, decode_contact, encode_args};
