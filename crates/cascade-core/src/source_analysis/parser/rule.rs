// Copyright 2026 Cascade contributors
// SPDX-License-Identifier: Apache-2.0

//! Names of the grammar rules that can appear as parse-tree nodes.

use std::fmt;

macro_rules! rules {
    ($($(#[$doc:meta])* $variant:ident => $name:literal,)*) => {
        /// A grammar rule, as reported through
        /// [`ParseEventSink::enter_rule`](super::ParseEventSink::enter_rule).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Rule {
            $($(#[$doc])* $variant,)*
        }

        impl Rule {
            /// Every rule, in declaration order.
            pub const ALL: &'static [Rule] = &[$(Rule::$variant,)*];

            /// The rule name used in tree dumps and path queries.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Rule::$variant => $name,)*
                }
            }
        }
    };
}

rules! {
    // === Stylesheet structure ===
    StyleSheet => "styleSheet",
    CharSet => "charSet",
    Imports => "imports",
    Namespaces => "namespaces",
    Body => "body",
    BodyItem => "bodyItem",
    Media => "media",
    MediaQueryList => "mediaQueryList",
    MediaQuery => "mediaQuery",
    MediaExpression => "mediaExpression",
    /// Any at-rule without a dedicated rule: `@font-face`, `@page`, ...
    AtRule => "atRule",
    /// A qualified rule: selectors followed by a declaration block.
    Rule => "rule",

    // === Selectors ===
    SelectorsGroup => "selectorsGroup",
    Selector => "selector",
    Combinator => "combinator",
    SimpleSelectorSequence => "simpleSelectorSequence",
    TypeSelector => "typeSelector",
    NamespacePrefix => "namespacePrefix",
    ElementName => "elementName",
    ElementSubsequent => "elementSubsequent",
    CssId => "cssId",
    CssClass => "cssClass",
    SlAttribute => "slAttribute",
    Pseudo => "pseudo",

    // === Declarations ===
    Declarations => "declarations",
    Declaration => "declaration",
    PropertyDeclaration => "propertyDeclaration",
    Property => "property",
    PropertyValue => "propertyValue",
    Expression => "expression",
    Term => "term",
    Operator => "operator",
    Function => "function",
    Prio => "prio",

    // === LESS / SCSS ===
    /// `@var: value` (LESS) or `$var: value` (SCSS)
    CpVariableDeclaration => "cpVariableDeclaration",
    /// A variable reference: `@var` or `$var`
    CpVariable => "cpVariable",
    /// `#{...}` (SCSS) or `@{...}` (LESS)
    Interpolation => "interpolation",
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<_> = Rule::ALL.iter().map(|r| r.name()).collect();
        assert_eq!(names.len(), Rule::ALL.len());
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(Rule::SelectorsGroup.to_string(), "selectorsGroup");
        assert_eq!(Rule::CpVariableDeclaration.to_string(), "cpVariableDeclaration");
    }
}
