pub use serpens_core::{CircleLogic, DnaLogic, NetworkLogic, SnakeLogic};
pub mod config {
    pub use serpens_core::config::*;
}
pub mod evolution {
    pub use serpens_core::evolution::*;
}
pub mod snapshot {
    pub use serpens_core::snapshot::*;
}
pub mod world {
    pub use serpens_core::world::*;
}
pub mod state {
    pub use serpens_data::*;
}
