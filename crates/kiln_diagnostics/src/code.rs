//! Numeric diagnostic codes and the catalogue the reference engine emits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A numeric diagnostic identifier, displayed with a `TS` prefix (e.g. `TS2307`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode(pub u32);

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub const fn new(number: u32) -> Self {
        Self(number)
    }

    /// Returns the numeric part of the code.
    pub fn number(self) -> u32 {
        self.0
    }

    /// `Initializers are not allowed in ambient contexts.`
    pub const AMBIENT_INITIALIZER: Self = Self(1039);
    /// `Type expected.`
    pub const TYPE_EXPECTED: Self = Self(1110);
    /// `Declaration or statement expected.`
    pub const STATEMENT_EXPECTED: Self = Self(1128);
    /// `Cannot find name 'X'.`
    pub const CANNOT_FIND_NAME: Self = Self(2304);
    /// `Cannot find module 'X' or its corresponding type declarations.`
    pub const CANNOT_FIND_MODULE: Self = Self(2307);
    /// `Cannot find global type 'X'.`
    pub const CANNOT_FIND_GLOBAL_TYPE: Self = Self(2318);
    /// `Type 'A' is not assignable to type 'B'.`
    pub const NOT_ASSIGNABLE: Self = Self(2322);
    /// `Property 'X' does not exist on type 'T'.`
    pub const PROPERTY_DOES_NOT_EXIST: Self = Self(2339);
    /// `Option 'X' must be an absolute path.`
    pub const OPTION_NOT_ABSOLUTE: Self = Self(5010);
    /// `Cannot write file 'X' because it would overwrite input file.`
    pub const OVERWRITES_INPUT: Self = Self(5055);
    /// `File 'X' not found.`
    pub const FILE_NOT_FOUND: Self = Self(6053);
    /// `Variable 'X' implicitly has an 'any' type.`
    pub const IMPLICIT_ANY: Self = Self(7005);
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TS{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        assert_eq!(format!("{}", DiagnosticCode::CANNOT_FIND_MODULE), "TS2307");
        assert_eq!(format!("{}", DiagnosticCode::new(42)), "TS42");
    }

    #[test]
    fn number_accessor() {
        assert_eq!(DiagnosticCode::PROPERTY_DOES_NOT_EXIST.number(), 2339);
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::FILE_NOT_FOUND;
        let json = serde_json::to_string(&code).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
