use anyhow::{Result, bail};

/// Splits a console line into words. Whitespace separates words; a pair of
/// double quotes groups everything between them into one word (quotes removed).
pub fn split_words(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quoted {
        bail!("unterminated quote");
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_on_whitespace() -> Result<()> {
        assert_eq!(
            split_words("  project   list\t--json\n")?,
            vec!["project", "list", "--json"]
        );
        Ok(())
    }

    #[test]
    fn test_quotes_group_words() -> Result<()> {
        assert_eq!(
            split_words(r#"client add "XYZ Ltd" "Jane Smith" jane@xyz.com"#)?,
            vec!["client", "add", "XYZ Ltd", "Jane Smith", "jane@xyz.com"]
        );
        assert_eq!(split_words(r#"project add """#)?, vec!["project", "add", ""]);
        Ok(())
    }

    #[test]
    fn test_blank_line_has_no_words() -> Result<()> {
        assert!(split_words("   ")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_unterminated_quote_is_an_error() {
        assert!(split_words(r#"project add "Website"#).is_err());
    }
}
