//! Terminal styling utilities
//!
//! Semantic colors for CLI output: green/yellow/red for status, cyan for
//! headers and identifiers, dim for secondary information.

use crossterm::style::Stylize;

/// Extension trait for consistent audiosw styling
///
/// # Examples
///
/// ```
/// use crossterm::style::Stylize;
/// use audiosw::style::AudioswStyle;
///
/// println!("{}", "OUTPUT DEVICES:".header());
/// println!("{}", "Switched to:".success());
/// println!("{}", "{0.0.0.00000000}.{guid}".technical());
/// ```
pub trait AudioswStyle: Stylize {
    /// Section headers (cyan bold)
    fn header(self) -> <<Self as Stylize>::Styled as Stylize>::Styled
    where
        Self: Sized,
        <Self as Stylize>::Styled: Stylize,
    {
        self.cyan().bold()
    }

    /// Success messages (green)
    fn success(self) -> <Self as Stylize>::Styled
    where
        Self: Sized,
    {
        self.green()
    }

    /// Problems (red)
    fn error(self) -> <Self as Stylize>::Styled
    where
        Self: Sized,
    {
        self.red()
    }

    /// Warnings and no-ops (yellow)
    fn warning(self) -> <Self as Stylize>::Styled
    where
        Self: Sized,
    {
        self.yellow()
    }

    /// Device ids, paths and other technical content (cyan)
    fn technical(self) -> <Self as Stylize>::Styled
    where
        Self: Sized,
    {
        self.cyan()
    }
}

// Implement for all types that implement Stylize (String, &str, etc.)
impl<T: Stylize> AudioswStyle for T {}
