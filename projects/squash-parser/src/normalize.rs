/// Splits migration source text into logical statements: newlines are
/// removed, then reinserted after every `{`, `;` and `}`. Comments are
/// stripped per physical line first so they cannot swallow the next
/// statement; markers inside quoted strings are kept.
pub fn normalize(source: &str) -> Vec<String> {
    let mut joined = String::with_capacity(source.len());
    let mut in_block_comment = false;
    for line in source.lines() {
        let code = strip_comments(line, &mut in_block_comment);
        let code = code.trim();
        if code.is_empty() {
            continue;
        }
        joined.push_str(code);
        joined.push(' ');
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for c in joined.chars() {
        current.push(c);
        if matches!(c, '{' | ';' | '}') {
            push_line(&mut lines, &mut current);
        }
    }
    push_line(&mut lines, &mut current);
    lines
}

fn push_line(lines: &mut Vec<String>, current: &mut String) {
    let line = current.trim();
    if !line.is_empty() {
        lines.push(line.to_string());
    }
    current.clear();
}

/// Removes `//`, `#` and `/* */` comments from one physical line. A block
/// comment left open carries over to the following lines.
fn strip_comments(line: &str, in_block_comment: &mut bool) -> String {
    let mut code = String::with_capacity(line.len());
    let mut quote: Option<char> = None;
    let mut chars = line.chars().filter(|&c| c != '\r').peekable();

    while let Some(c) = chars.next() {
        if *in_block_comment {
            if c == '*' && chars.peek() == Some(&'/') {
                chars.next();
                *in_block_comment = false;
                if !code.ends_with(char::is_whitespace) {
                    code.push(' ');
                }
            }
            continue;
        }

        if let Some(open) = quote {
            code.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    code.push(escaped);
                }
            } else if c == open {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                code.push(c);
            }
            '#' => break,
            '/' if chars.peek() == Some(&'/') => break,
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                *in_block_comment = true;
            }
            _ => code.push(c),
        }
    }
    code
}
