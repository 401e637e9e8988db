// 👪 Household members
//
// The same three people appear as expense `responsible` and task `assignee`.

closed_enum! {
    /// A member of the household
    Person, "person" {
        JoaoSilva => "João Silva", "João Silva";
        MariaSilva => "Maria Silva", "Maria Silva";
        AnaSilva => "Ana Silva", "Ana Silva";
    }
}

impl Person {
    /// Display name, as used by the free-text search
    pub fn name(&self) -> &'static str {
        self.label()
    }

    /// Avatar initials: first letter of every word ("Maria Silva" → "MS")
    pub fn initials(&self) -> String {
        crate::labels::initials(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_parses_display_name_case_insensitively() {
        assert_eq!("joão silva".parse::<Person>().unwrap(), Person::JoaoSilva);
        assert_eq!("Ana Silva".parse::<Person>().unwrap(), Person::AnaSilva);
        assert!("Pedro Silva".parse::<Person>().is_err());
    }

    #[test]
    fn test_person_initials() {
        assert_eq!(Person::MariaSilva.initials(), "MS");
        assert_eq!(Person::JoaoSilva.initials(), "JS");
    }

    #[test]
    fn test_person_serializes_as_display_name() {
        let json = serde_json::to_string(&Person::JoaoSilva).unwrap();
        assert_eq!(json, "\"João Silva\"");
    }
}
