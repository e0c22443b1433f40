//! Lightweight XPath syntax check
//!
//! Catches the mistakes that would otherwise only surface when the host
//! application loads the view: unbalanced brackets, unterminated string
//! literals, empty location steps and empty predicates. It does not
//! evaluate or fully parse the expression.

pub fn check_syntax(expr: &str) -> Result<(), String> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err("expression is empty".to_string());
    }

    let mut quote: Option<char> = None;
    let mut open: Vec<(char, usize)> = Vec::new();
    let mut slashes = 0usize;
    let mut prev = '\0';

    for (offset, c) in expr.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            prev = c;
            continue;
        }

        if c == '/' && open.is_empty() {
            slashes += 1;
            if slashes > 2 {
                return Err(format!("empty location step at offset {}", offset));
            }
        } else if !c.is_whitespace() {
            slashes = 0;
        }

        match c {
            '\'' | '"' => quote = Some(c),
            '[' | '(' => open.push((c, offset)),
            ']' | ')' => {
                let expected = if c == ']' { '[' } else { '(' };
                match open.pop() {
                    Some((o, _)) if o == expected => {}
                    _ => return Err(format!("unbalanced '{}' at offset {}", c, offset)),
                }
                if c == ']' && prev == '[' {
                    return Err(format!("empty predicate at offset {}", offset - 1));
                }
            }
            _ => {}
        }
        if !c.is_whitespace() {
            prev = c;
        }
    }

    if quote.is_some() {
        return Err("unterminated string literal".to_string());
    }
    if let Some((c, offset)) = open.pop() {
        return Err(format!("unclosed '{}' at offset {}", c, offset));
    }
    if expr.len() > 1 && expr.ends_with('/') {
        return Err("expression ends with an empty location step".to_string());
    }
    Ok(())
}
