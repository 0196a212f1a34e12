//! Source language and symbol name types.

use std::fmt;
use std::str::FromStr;

/// Source language of a compile unit or symbol.
///
/// Names follow the spelling debuggers commonly print (`c++`, `objective-c`,
/// ...). `Unknown` doubles as the "not resolved" value of a compile unit's
/// language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language
{
    /// Unknown, or not yet resolved.
    #[default]
    Unknown,
    /// ISO C89.
    C89,
    /// C without a specific standard.
    C,
    /// ISO C99.
    C99,
    /// ISO C11.
    C11,
    /// C++ without a specific standard.
    Cpp,
    /// ISO C++11.
    Cpp11,
    /// ISO C++14.
    Cpp14,
    /// ISO C++17.
    Cpp17,
    /// Objective-C.
    ObjC,
    /// Objective-C++.
    ObjCpp,
    /// Rust.
    Rust,
    /// Swift.
    Swift,
    /// Go.
    Go,
    /// D.
    D,
    /// Fortran 90.
    Fortran90,
}

impl Language
{
    /// Every language, in declaration order.
    pub const ALL: [Language; 16] = [
        Language::Unknown,
        Language::C89,
        Language::C,
        Language::C99,
        Language::C11,
        Language::Cpp,
        Language::Cpp11,
        Language::Cpp14,
        Language::Cpp17,
        Language::ObjC,
        Language::ObjCpp,
        Language::Rust,
        Language::Swift,
        Language::Go,
        Language::D,
        Language::Fortran90,
    ];

    /// Printable name of the language.
    #[must_use]
    pub const fn name(self) -> &'static str
    {
        match self {
            Language::Unknown => "unknown",
            Language::C89 => "c89",
            Language::C => "c",
            Language::C99 => "c99",
            Language::C11 => "c11",
            Language::Cpp => "c++",
            Language::Cpp11 => "c++11",
            Language::Cpp14 => "c++14",
            Language::Cpp17 => "c++17",
            Language::ObjC => "objective-c",
            Language::ObjCpp => "objective-c++",
            Language::Rust => "rust",
            Language::Swift => "swift",
            Language::Go => "go",
            Language::D => "d",
            Language::Fortran90 => "fortran90",
        }
    }

    /// Whether this is a resolved language.
    #[must_use]
    pub const fn is_known(self) -> bool
    {
        !matches!(self, Language::Unknown)
    }
}

impl fmt::Display for Language
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.name())
    }
}

impl FromStr for Language
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        let lowered = s.to_lowercase();
        match lowered.as_str() {
            "cpp" | "cxx" => return Ok(Language::Cpp),
            "objc" => return Ok(Language::ObjC),
            "objcpp" | "objc++" => return Ok(Language::ObjCpp),
            _ => {}
        }

        Language::ALL
            .into_iter()
            .find(|language| language.name() == lowered)
            .ok_or_else(|| format!("Unknown language: {s}"))
    }
}

/// A function or symbol name with demangling metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolName
{
    raw: String,
    demangled: Option<String>,
    language: Language,
}

impl SymbolName
{
    /// Construct from a raw linkage name.
    #[must_use]
    pub fn new(raw: String, demangled: Option<String>, language: Language) -> Self
    {
        Self {
            raw,
            demangled,
            language,
        }
    }

    /// Raw (mangled) name emitted in the object file.
    #[must_use]
    pub fn raw(&self) -> &str
    {
        &self.raw
    }

    /// Demangled human-friendly name if available.
    #[must_use]
    pub fn demangled(&self) -> Option<&str>
    {
        self.demangled.as_deref()
    }

    /// Preferred presentation (demangled fallback to raw).
    #[must_use]
    pub fn display_name(&self) -> &str
    {
        self.demangled.as_deref().unwrap_or(&self.raw)
    }

    /// Language classification for the symbol.
    #[must_use]
    pub fn language(&self) -> Language
    {
        self.language
    }
}

impl fmt::Display for SymbolName
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.display_name())
    }
}
