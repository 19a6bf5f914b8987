//! Light/dark theme state
//!
//! `ThemeStore` is the only writer; views hold `ThemeReader`s and read the
//! current mode when they draw.

use ratatui::style::Color;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn from_dark_flag(dark: bool) -> Self {
        if dark { ThemeMode::Dark } else { ThemeMode::Light }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, ThemeMode::Dark)
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    /// Navbar toggle glyph: shows the mode you would switch to
    pub fn toggle_icon(self) -> &'static str {
        match self {
            ThemeMode::Light => "🌙",
            ThemeMode::Dark => "☀",
        }
    }
}

/// Writer side of the theme observable
#[derive(Debug)]
pub struct ThemeStore {
    tx: watch::Sender<ThemeMode>,
}

impl ThemeStore {
    pub fn new(initial: ThemeMode) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> ThemeMode {
        *self.tx.borrow()
    }

    /// Flip the mode and notify every reader
    pub fn toggle(&self) -> ThemeMode {
        self.tx.send_modify(|mode| *mode = mode.toggled());
        self.current()
    }

    pub fn subscribe(&self) -> ThemeReader {
        ThemeReader {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for ThemeStore {
    fn default() -> Self {
        Self::new(ThemeMode::default())
    }
}

/// Reader side of the theme observable
#[derive(Debug, Clone)]
pub struct ThemeReader {
    rx: watch::Receiver<ThemeMode>,
}

impl ThemeReader {
    pub fn current(&self) -> ThemeMode {
        *self.rx.borrow()
    }

    /// Wait for the next toggle; `None` once the store is gone
    pub async fn changed(&mut self) -> Option<ThemeMode> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    pub fn palette(&self) -> Palette {
        Palette::for_mode(self.current())
    }
}

/// Colors a view draws with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub surface: Color,
    pub highlight: Color,
    pub navbar: Color,
    pub control: Color,
    pub muted: Color,
    pub positive: Color,
    pub negative: Color,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self {
                background: Color::Rgb(0xf0, 0xf2, 0xf5),
                foreground: Color::Black,
                surface: Color::Rgb(0xff, 0xff, 0xff),
                highlight: Color::Rgb(0xf0, 0xf0, 0xf0),
                navbar: Color::Rgb(0xdd, 0xdd, 0xdd),
                control: Color::Rgb(0xcc, 0xcc, 0xcc),
                muted: Color::Rgb(0x55, 0x55, 0x55),
                positive: Color::Rgb(0x16, 0xa3, 0x4a),
                negative: Color::Rgb(0xdc, 0x26, 0x26),
            },
            ThemeMode::Dark => Self {
                background: Color::Rgb(0x12, 0x12, 0x12),
                foreground: Color::White,
                surface: Color::Rgb(0x2e, 0x2e, 0x2e),
                highlight: Color::Rgb(0x44, 0x44, 0x44),
                navbar: Color::Rgb(0x44, 0x44, 0x44),
                control: Color::Rgb(0x66, 0x66, 0x66),
                muted: Color::Rgb(0xaa, 0xaa, 0xaa),
                positive: Color::Rgb(0x4a, 0xde, 0x80),
                negative: Color::Rgb(0xf8, 0x71, 0x71),
            },
        }
    }
}
