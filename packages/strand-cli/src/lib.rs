use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Help styling shared by every Strand binary.
pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Magenta.on_default() | Effects::BOLD)
		.usage(AnsiColor::Magenta.on_default() | Effects::BOLD)
		.literal(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Yellow.on_default())
		.error(AnsiColor::Red.on_default() | Effects::BOLD)
}
