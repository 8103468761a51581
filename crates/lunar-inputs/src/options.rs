//! Dialect selection for the lexer and parser.

use std::fmt;
use std::str::FromStr;

/// How `continue` is recognized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContinueType {
    /// `continue` is a plain identifier.
    None,
    /// `continue` is a reserved keyword.
    Keyword,
    /// `continue` is an identifier everywhere except at the start of a statement
    /// that cannot be anything else.
    ContextualKeyword,
}

/// The set of syntax features accepted by a parse.
///
/// Presets cover the common dialects; anything else is built with struct
/// update syntax:
///
/// ```ignore
/// let options = LuaSyntaxOptions { accept_goto: false, ..LuaSyntaxOptions::LUA53 };
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LuaSyntaxOptions {
    pub accept_binary_numbers: bool,
    pub accept_c_comments: bool,
    pub accept_compound_assignment: bool,
    pub accept_empty_statements: bool,
    pub accept_c_boolean_operators: bool,
    pub accept_goto: bool,
    pub accept_hex_escapes_in_strings: bool,
    pub accept_hex_float_literals: bool,
    pub accept_octal_numbers: bool,
    pub accept_shebang: bool,
    pub accept_underscore_in_number_literals: bool,
    pub use_luajit_identifier_rules: bool,
    pub accept_bitwise_operators: bool,
    pub accept_whitespace_escape: bool,
    pub accept_unicode_escape: bool,
    pub accept_floor_division: bool,
    pub accept_local_variable_attributes: bool,
    pub continue_type: ContinueType,
}

impl LuaSyntaxOptions {
    pub const LUA51: Self = Self {
        accept_binary_numbers: false,
        accept_c_comments: false,
        accept_compound_assignment: false,
        accept_empty_statements: false,
        accept_c_boolean_operators: false,
        accept_goto: false,
        accept_hex_escapes_in_strings: false,
        accept_hex_float_literals: false,
        accept_octal_numbers: false,
        accept_shebang: false,
        accept_underscore_in_number_literals: false,
        use_luajit_identifier_rules: false,
        accept_bitwise_operators: false,
        accept_whitespace_escape: false,
        accept_unicode_escape: false,
        accept_floor_division: false,
        accept_local_variable_attributes: false,
        continue_type: ContinueType::None,
    };

    pub const LUA52: Self = Self {
        accept_empty_statements: true,
        accept_goto: true,
        accept_hex_escapes_in_strings: true,
        accept_hex_float_literals: true,
        accept_whitespace_escape: true,
        ..Self::LUA51
    };

    pub const LUA53: Self = Self {
        accept_bitwise_operators: true,
        accept_unicode_escape: true,
        accept_floor_division: true,
        ..Self::LUA52
    };

    pub const LUA54: Self = Self { accept_local_variable_attributes: true, ..Self::LUA53 };

    pub const LUAJIT20: Self = Self {
        accept_empty_statements: true,
        accept_goto: true,
        accept_hex_escapes_in_strings: true,
        accept_hex_float_literals: true,
        use_luajit_identifier_rules: true,
        accept_whitespace_escape: true,
        ..Self::LUA51
    };

    pub const LUAJIT21: Self =
        Self { accept_binary_numbers: true, accept_unicode_escape: true, ..Self::LUAJIT20 };

    /// Garry's Mod Lua.
    pub const GMOD: Self = Self {
        accept_c_comments: true,
        accept_c_boolean_operators: true,
        continue_type: ContinueType::Keyword,
        ..Self::LUAJIT20
    };

    /// Roblox Luau, without its type annotation syntax.
    pub const ROBLOX: Self = Self {
        accept_binary_numbers: true,
        accept_compound_assignment: true,
        accept_hex_escapes_in_strings: true,
        accept_hex_float_literals: true,
        accept_underscore_in_number_literals: true,
        accept_bitwise_operators: true,
        accept_whitespace_escape: true,
        accept_unicode_escape: true,
        accept_floor_division: true,
        continue_type: ContinueType::ContextualKeyword,
        ..Self::LUA51
    };

    pub const ALL: Self = Self {
        accept_binary_numbers: true,
        accept_c_comments: true,
        accept_compound_assignment: true,
        accept_empty_statements: true,
        accept_c_boolean_operators: true,
        accept_goto: true,
        accept_hex_escapes_in_strings: true,
        accept_hex_float_literals: true,
        accept_octal_numbers: true,
        accept_shebang: true,
        accept_underscore_in_number_literals: true,
        use_luajit_identifier_rules: true,
        accept_bitwise_operators: true,
        accept_whitespace_escape: true,
        accept_unicode_escape: true,
        accept_floor_division: true,
        accept_local_variable_attributes: true,
        continue_type: ContinueType::ContextualKeyword,
    };

    pub const PRESETS: [(&'static str, Self); 9] = [
        ("Lua 5.1", Self::LUA51),
        ("Lua 5.2", Self::LUA52),
        ("Lua 5.3", Self::LUA53),
        ("Lua 5.4", Self::LUA54),
        ("LuaJIT 2.0", Self::LUAJIT20),
        ("LuaJIT 2.1", Self::LUAJIT21),
        ("GLua", Self::GMOD),
        ("Roblox", Self::ROBLOX),
        ("All", Self::ALL),
    ];

    /// Display name of the preset these options are equal to, if any.
    pub fn name(&self) -> Option<&'static str> {
        Self::PRESETS.iter().find(|(_, preset)| preset == self).map(|(name, _)| *name)
    }
}

impl Default for LuaSyntaxOptions {
    fn default() -> Self {
        Self::ALL
    }
}

impl fmt::Display for LuaSyntaxOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name().unwrap_or("Custom"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown Lua dialect `{0}`")]
pub struct UnknownPreset(pub String);

impl FromStr for LuaSyntaxOptions {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && !matches!(c, '.' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        let options = match normalized.as_str() {
            "51" | "lua51" => Self::LUA51,
            "52" | "lua52" => Self::LUA52,
            "53" | "lua53" => Self::LUA53,
            "54" | "lua54" => Self::LUA54,
            "luajit" | "luajit20" | "luajit2" => Self::LUAJIT20,
            "luajit21" => Self::LUAJIT21,
            "gmod" | "glua" => Self::GMOD,
            "roblox" | "luau" => Self::ROBLOX,
            "all" => Self::ALL,
            _ => return Err(UnknownPreset(s.to_owned())),
        };

        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_build_on_each_other() {
        let lua52 = LuaSyntaxOptions::LUA52;
        assert!(lua52.accept_goto);
        assert!(!lua52.accept_bitwise_operators);

        let lua54 = LuaSyntaxOptions::LUA54;
        assert!(lua54.accept_goto && lua54.accept_bitwise_operators);
        assert!(lua54.accept_local_variable_attributes);

        let gmod = LuaSyntaxOptions::GMOD;
        assert!(gmod.use_luajit_identifier_rules);
        assert_eq!(gmod.continue_type, ContinueType::Keyword);
    }

    #[test]
    fn preset_names() {
        assert_eq!(LuaSyntaxOptions::LUA53.name(), Some("Lua 5.3"));
        assert_eq!(LuaSyntaxOptions::default().to_string(), "All");

        let custom = LuaSyntaxOptions { accept_goto: false, ..LuaSyntaxOptions::LUA53 };
        assert_eq!(custom.name(), None);
        assert_eq!(custom.to_string(), "Custom");
    }

    #[test]
    fn parse_preset_names() {
        assert_eq!("5.1".parse(), Ok(LuaSyntaxOptions::LUA51));
        assert_eq!("Lua 5.4".parse(), Ok(LuaSyntaxOptions::LUA54));
        assert_eq!("LuaJIT-2.1".parse(), Ok(LuaSyntaxOptions::LUAJIT21));
        assert_eq!("glua".parse(), Ok(LuaSyntaxOptions::GMOD));

        let err = "python".parse::<LuaSyntaxOptions>().unwrap_err();
        assert_eq!(err.to_string(), "unknown Lua dialect `python`");
    }
}
