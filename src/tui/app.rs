mod state;

pub use state::{AppState, Button, InputAction, BUTTONS};
