// Entity Models
//
// Expenses and tasks are flat records with no relationships. Every field
// that the household vocabulary fixes (people, categories, statuses) is a
// closed enum, so a record can only hold values from the known sets.

/// Declares a closed enum with a wire value (serde + query strings) and a
/// pt-BR display label for every variant.
macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $wire:literal, $label:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in declaration order (the order option lists use)
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = crate::error::Error;

            /// Accepts either the wire value or the display label, ignoring case
            fn from_str(s: &str) -> crate::error::Result<Self> {
                let needle = s.trim().to_lowercase();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| {
                        v.as_str().to_lowercase() == needle || v.label().to_lowercase() == needle
                    })
                    .ok_or_else(|| crate::error::Error::unknown($kind, s))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

pub mod person;
pub mod expense;
pub mod task;

pub use person::Person;
pub use expense::{Expense, ExpenseCategory, ExpenseStatus, ExpenseType};
pub use task::{Frequency, Task, TaskCategory, TaskPriority, TaskStatus};
