pub mod form;

pub use form::{Form, FormErrors};
