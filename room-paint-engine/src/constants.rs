pub mod path {
    /// Asset folder holding the room manifest and model.
    pub const RELATIVE_MANIFEST_PATH: &str = "room";
}
