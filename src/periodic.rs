//! Periodic table lookups used to order element pairs
//!
//! Pivoted pair tables are keyed by Mendeleev number (Pettifor's chemical
//! scale) so that matrices come out in a canonical order regardless of the
//! order a store was built in. Lookups go through the [`PeriodicTable`] trait;
//! [`MendeleevTable`] is the built-in implementation covering H through Lr.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rank lookup used to order pair tables.
pub trait PeriodicTable {
    /// Mendeleev number of `symbol`, or `None` if the symbol is unknown.
    fn mendeleev_rank(&self, symbol: &str) -> Option<u32>;
}

/// Coarse chemical category of an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementGroup {
    Alkali,
    Alkaline,
    TransitionMetal,
    PostTransitionMetal,
    Metalloid,
    Lanthanoid,
    Actinoid,
    Chalcogen,
    Halogen,
    NobleGas,
    Others,
}

impl ElementGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementGroup::Alkali => "Alkali",
            ElementGroup::Alkaline => "Alkaline",
            ElementGroup::TransitionMetal => "TM",
            ElementGroup::PostTransitionMetal => "Post-TM",
            ElementGroup::Metalloid => "Metalloid",
            ElementGroup::Lanthanoid => "Lanthanoid",
            ElementGroup::Actinoid => "Actinoid",
            ElementGroup::Chalcogen => "Chalcogen",
            ElementGroup::Halogen => "Halogen",
            ElementGroup::NobleGas => "Noble gas",
            ElementGroup::Others => "Others",
        }
    }
}

impl fmt::Display for ElementGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static data for one element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementData {
    pub symbol: &'static str,
    /// Atomic number.
    pub number: u32,
    /// Mendeleev number on Pettifor's scale.
    pub mendeleev: u32,
    pub group: ElementGroup,
}

const ELEMENTS: [ElementData; 103] = [
    ElementData { symbol: "H", number: 1, mendeleev: 103, group: ElementGroup::Others },
    ElementData { symbol: "He", number: 2, mendeleev: 1, group: ElementGroup::NobleGas },
    ElementData { symbol: "Li", number: 3, mendeleev: 12, group: ElementGroup::Alkali },
    ElementData { symbol: "Be", number: 4, mendeleev: 77, group: ElementGroup::Alkaline },
    ElementData { symbol: "B", number: 5, mendeleev: 86, group: ElementGroup::Metalloid },
    ElementData { symbol: "C", number: 6, mendeleev: 95, group: ElementGroup::Others },
    ElementData { symbol: "N", number: 7, mendeleev: 100, group: ElementGroup::Others },
    ElementData { symbol: "O", number: 8, mendeleev: 101, group: ElementGroup::Chalcogen },
    ElementData { symbol: "F", number: 9, mendeleev: 102, group: ElementGroup::Halogen },
    ElementData { symbol: "Ne", number: 10, mendeleev: 2, group: ElementGroup::NobleGas },
    ElementData { symbol: "Na", number: 11, mendeleev: 11, group: ElementGroup::Alkali },
    ElementData { symbol: "Mg", number: 12, mendeleev: 73, group: ElementGroup::Alkaline },
    ElementData { symbol: "Al", number: 13, mendeleev: 80, group: ElementGroup::PostTransitionMetal },
    ElementData { symbol: "Si", number: 14, mendeleev: 85, group: ElementGroup::Metalloid },
    ElementData { symbol: "P", number: 15, mendeleev: 90, group: ElementGroup::Others },
    ElementData { symbol: "S", number: 16, mendeleev: 94, group: ElementGroup::Chalcogen },
    ElementData { symbol: "Cl", number: 17, mendeleev: 99, group: ElementGroup::Halogen },
    ElementData { symbol: "Ar", number: 18, mendeleev: 3, group: ElementGroup::NobleGas },
    ElementData { symbol: "K", number: 19, mendeleev: 10, group: ElementGroup::Alkali },
    ElementData { symbol: "Ca", number: 20, mendeleev: 16, group: ElementGroup::Alkaline },
    ElementData { symbol: "Sc", number: 21, mendeleev: 19, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Ti", number: 22, mendeleev: 51, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "V", number: 23, mendeleev: 54, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Cr", number: 24, mendeleev: 57, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Mn", number: 25, mendeleev: 60, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Fe", number: 26, mendeleev: 61, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Co", number: 27, mendeleev: 64, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Ni", number: 28, mendeleev: 67, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Cu", number: 29, mendeleev: 72, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Zn", number: 30, mendeleev: 76, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Ga", number: 31, mendeleev: 81, group: ElementGroup::PostTransitionMetal },
    ElementData { symbol: "Ge", number: 32, mendeleev: 84, group: ElementGroup::Metalloid },
    ElementData { symbol: "As", number: 33, mendeleev: 89, group: ElementGroup::Metalloid },
    ElementData { symbol: "Se", number: 34, mendeleev: 93, group: ElementGroup::Chalcogen },
    ElementData { symbol: "Br", number: 35, mendeleev: 98, group: ElementGroup::Halogen },
    ElementData { symbol: "Kr", number: 36, mendeleev: 4, group: ElementGroup::NobleGas },
    ElementData { symbol: "Rb", number: 37, mendeleev: 9, group: ElementGroup::Alkali },
    ElementData { symbol: "Sr", number: 38, mendeleev: 15, group: ElementGroup::Alkaline },
    ElementData { symbol: "Y", number: 39, mendeleev: 25, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Zr", number: 40, mendeleev: 49, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Nb", number: 41, mendeleev: 53, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Mo", number: 42, mendeleev: 56, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Tc", number: 43, mendeleev: 59, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Ru", number: 44, mendeleev: 62, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Rh", number: 45, mendeleev: 65, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Pd", number: 46, mendeleev: 69, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Ag", number: 47, mendeleev: 71, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Cd", number: 48, mendeleev: 75, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "In", number: 49, mendeleev: 79, group: ElementGroup::PostTransitionMetal },
    ElementData { symbol: "Sn", number: 50, mendeleev: 83, group: ElementGroup::PostTransitionMetal },
    ElementData { symbol: "Sb", number: 51, mendeleev: 88, group: ElementGroup::Metalloid },
    ElementData { symbol: "Te", number: 52, mendeleev: 92, group: ElementGroup::Chalcogen },
    ElementData { symbol: "I", number: 53, mendeleev: 97, group: ElementGroup::Halogen },
    ElementData { symbol: "Xe", number: 54, mendeleev: 5, group: ElementGroup::NobleGas },
    ElementData { symbol: "Cs", number: 55, mendeleev: 8, group: ElementGroup::Alkali },
    ElementData { symbol: "Ba", number: 56, mendeleev: 14, group: ElementGroup::Alkaline },
    ElementData { symbol: "La", number: 57, mendeleev: 33, group: ElementGroup::Lanthanoid },
    ElementData { symbol: "Ce", number: 58, mendeleev: 32, group: ElementGroup::Lanthanoid },
    ElementData { symbol: "Pr", number: 59, mendeleev: 31, group: ElementGroup::Lanthanoid },
    ElementData { symbol: "Nd", number: 60, mendeleev: 30, group: ElementGroup::Lanthanoid },
    ElementData { symbol: "Pm", number: 61, mendeleev: 29, group: ElementGroup::Lanthanoid },
    ElementData { symbol: "Sm", number: 62, mendeleev: 28, group: ElementGroup::Lanthanoid },
    ElementData { symbol: "Eu", number: 63, mendeleev: 18, group: ElementGroup::Lanthanoid },
    ElementData { symbol: "Gd", number: 64, mendeleev: 27, group: ElementGroup::Lanthanoid },
    ElementData { symbol: "Tb", number: 65, mendeleev: 26, group: ElementGroup::Lanthanoid },
    ElementData { symbol: "Dy", number: 66, mendeleev: 24, group: ElementGroup::Lanthanoid },
    ElementData { symbol: "Ho", number: 67, mendeleev: 23, group: ElementGroup::Lanthanoid },
    ElementData { symbol: "Er", number: 68, mendeleev: 22, group: ElementGroup::Lanthanoid },
    ElementData { symbol: "Tm", number: 69, mendeleev: 21, group: ElementGroup::Lanthanoid },
    ElementData { symbol: "Yb", number: 70, mendeleev: 17, group: ElementGroup::Lanthanoid },
    ElementData { symbol: "Lu", number: 71, mendeleev: 20, group: ElementGroup::Lanthanoid },
    ElementData { symbol: "Hf", number: 72, mendeleev: 50, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Ta", number: 73, mendeleev: 52, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "W", number: 74, mendeleev: 55, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Re", number: 75, mendeleev: 58, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Os", number: 76, mendeleev: 63, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Ir", number: 77, mendeleev: 66, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Pt", number: 78, mendeleev: 68, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Au", number: 79, mendeleev: 70, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Hg", number: 80, mendeleev: 74, group: ElementGroup::TransitionMetal },
    ElementData { symbol: "Tl", number: 81, mendeleev: 78, group: ElementGroup::PostTransitionMetal },
    ElementData { symbol: "Pb", number: 82, mendeleev: 82, group: ElementGroup::PostTransitionMetal },
    ElementData { symbol: "Bi", number: 83, mendeleev: 87, group: ElementGroup::PostTransitionMetal },
    ElementData { symbol: "Po", number: 84, mendeleev: 91, group: ElementGroup::Chalcogen },
    ElementData { symbol: "At", number: 85, mendeleev: 96, group: ElementGroup::Halogen },
    ElementData { symbol: "Rn", number: 86, mendeleev: 6, group: ElementGroup::NobleGas },
    ElementData { symbol: "Fr", number: 87, mendeleev: 7, group: ElementGroup::Alkali },
    ElementData { symbol: "Ra", number: 88, mendeleev: 13, group: ElementGroup::Alkaline },
    ElementData { symbol: "Ac", number: 89, mendeleev: 48, group: ElementGroup::Actinoid },
    ElementData { symbol: "Th", number: 90, mendeleev: 47, group: ElementGroup::Actinoid },
    ElementData { symbol: "Pa", number: 91, mendeleev: 46, group: ElementGroup::Actinoid },
    ElementData { symbol: "U", number: 92, mendeleev: 45, group: ElementGroup::Actinoid },
    ElementData { symbol: "Np", number: 93, mendeleev: 44, group: ElementGroup::Actinoid },
    ElementData { symbol: "Pu", number: 94, mendeleev: 43, group: ElementGroup::Actinoid },
    ElementData { symbol: "Am", number: 95, mendeleev: 42, group: ElementGroup::Actinoid },
    ElementData { symbol: "Cm", number: 96, mendeleev: 41, group: ElementGroup::Actinoid },
    ElementData { symbol: "Bk", number: 97, mendeleev: 40, group: ElementGroup::Actinoid },
    ElementData { symbol: "Cf", number: 98, mendeleev: 39, group: ElementGroup::Actinoid },
    ElementData { symbol: "Es", number: 99, mendeleev: 38, group: ElementGroup::Actinoid },
    ElementData { symbol: "Fm", number: 100, mendeleev: 37, group: ElementGroup::Actinoid },
    ElementData { symbol: "Md", number: 101, mendeleev: 36, group: ElementGroup::Actinoid },
    ElementData { symbol: "No", number: 102, mendeleev: 35, group: ElementGroup::Actinoid },
    ElementData { symbol: "Lr", number: 103, mendeleev: 34, group: ElementGroup::Actinoid },
];

/// Built-in periodic table for elements 1 (H) through 103 (Lr).
///
/// # Examples
///
/// ```
/// use element_embeddings::periodic::{MendeleevTable, PeriodicTable};
///
/// let table = MendeleevTable;
/// assert_eq!(table.mendeleev_rank("He"), Some(1));
/// assert_eq!(table.mendeleev_rank("H"), Some(103));
/// assert_eq!(table.mendeleev_rank("Xx"), None);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct MendeleevTable;

impl MendeleevTable {
    /// Look up the static record for `symbol`.
    pub fn element(&self, symbol: &str) -> Option<&'static ElementData> {
        ELEMENTS.iter().find(|e| e.symbol == symbol)
    }

    /// Chemical category of `symbol`.
    pub fn group(&self, symbol: &str) -> Option<ElementGroup> {
        self.element(symbol).map(|e| e.group)
    }

    /// All elements in atomic-number order.
    pub fn elements(&self) -> &'static [ElementData] {
        &ELEMENTS
    }
}

impl PeriodicTable for MendeleevTable {
    fn mendeleev_rank(&self, symbol: &str) -> Option<u32> {
        self.element(symbol).map(|e| e.mendeleev)
    }
}
