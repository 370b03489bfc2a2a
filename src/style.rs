use std::fmt::{Display, Error, Formatter};

/// The declarations of a `style` attribute, in source order.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Style {
    declarations: Vec<(String, String)>,
}

impl Style {
    pub fn parse(string: &str) -> Style {
        let declarations = string
            .split(';')
            .filter_map(|declaration| {
                let mut parts = declaration.splitn(2, ':');
                let name = parts.next()?.trim();
                let value = parts.next()?.trim();
                if name.is_empty() {
                    None
                } else {
                    Some((name.to_owned(), value.to_owned()))
                }
            })
            .collect();

        Style { declarations }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl Display for Style {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        for (index, (name, value)) in self.declarations.iter().enumerate() {
            if index > 0 {
                f.write_str(";")?;
            }
            f.write_fmt(format_args!("{}:{}", name, value))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_inkscape_style() {
        let style = Style::parse("fill:none; stroke:#000000;stroke-width:2;stroke-dasharray:4, 2;");

        assert_eq!(style.get("stroke"), Some("#000000"));
        assert_eq!(style.get("stroke-dasharray"), Some("4, 2"));
        assert_eq!(
            style.to_string(),
            "fill:none;stroke:#000000;stroke-width:2;stroke-dasharray:4, 2"
        );
    }

    #[test]
    fn skips_malformed_declarations() {
        let style = Style::parse(";;nonsense;:red;fill:blue");

        assert_eq!(style.to_string(), "fill:blue");
    }

    #[test]
    fn empty_style() {
        assert!(Style::parse("").is_empty());
        assert_eq!(Style::default().to_string(), "");
    }
}
