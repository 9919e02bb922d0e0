pub mod png;
pub mod wallpaper;
