//! Helpers shared by the workspace binaries.

pub mod utils {
    pub mod logging;
}
