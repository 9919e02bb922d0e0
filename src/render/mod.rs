pub mod cpu;
pub mod fonts;
pub mod layout;
pub mod palette;
pub mod text;
