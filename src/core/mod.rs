// Page-layer modules and shared errors
pub mod form {
    pub use crate::form::*;
}

pub mod validation {
    pub use crate::validation::*;
}

pub mod risk_meter {
    pub use crate::risk_meter::*;
}

pub mod errors {
    pub use crate::errors::*;
}
