//! Custom metrics templates.
//!
//! Template files are written in the Go `text/template` dialect the first
//! deployments used, so the accepted syntax is a small compatible subset:
//!
//! - `{{ .Env.NAME }}` and `{{ index .Env "NAME" }}` read the environment
//!   (an unset name renders as `<no value>` through the field and as an
//!   empty string through `index`)
//! - `{{ or .Env.A .Env.B "fallback" }}` picks the first non-empty argument
//! - `"quoted"` and `` `raw` `` string literals
//! - `{{/* comments */}}`, opened right after `{{` or `{{- `
//! - `{{- ` and ` -}}` trim whitespace around an action
//!
//! Control structures (`if`, `range`, ...) and pipelines are rejected at
//! parse time.

use crate::domain::errors::TemplateError;
use std::collections::HashMap;

const KEYWORDS: &[&str] = &[
    "if", "else", "end", "range", "with", "define", "template", "block", "break", "continue",
];

#[derive(Debug, Clone, PartialEq)]
enum Token {
    /// `.A.B`, empty path for `.`
    Field(Vec<String>),
    Str(String),
    Ident(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Action { line: usize, command: Vec<Token> },
}

enum Value<'e> {
    Text(String),
    Env(&'e HashMap<String, String>),
    Data(&'e HashMap<String, String>),
    NoValue,
}

impl Value<'_> {
    fn truthy(&self) -> bool {
        match self {
            Value::Text(s) => !s.is_empty(),
            Value::Env(env) => !env.is_empty(),
            Value::Data(_) => true,
            Value::NoValue => false,
        }
    }

    fn render(&self, out: &mut String) {
        match self {
            Value::Text(s) => out.push_str(s),
            Value::Env(env) => out.push_str(&format_env(env)),
            Value::Data(env) => {
                out.push_str("map[Env:");
                out.push_str(&format_env(env));
                out.push(']');
            }
            Value::NoValue => out.push_str("<no value>"),
        }
    }
}

fn format_env(env: &HashMap<String, String>) -> String {
    let mut keys: Vec<&String> = env.keys().collect();
    keys.sort();
    let pairs: Vec<String> = keys.iter().map(|k| format!("{}:{}", k, env[*k])).collect();
    format!("map[{}]", pairs.join(" "))
}

/// A parsed template, reusable across renders.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    pub fn parse(src: &str) -> Result<Self, TemplateError> {
        let mut nodes = Vec::new();
        let mut pos = 0;
        let mut trim_next = false;

        while pos < src.len() {
            let Some(rel) = src[pos..].find("{{") else {
                push_text(&mut nodes, &src[pos..], trim_next, false);
                break;
            };
            let open = pos + rel;
            let line = line_of(src, open);

            let mut body_start = open + 2;
            let trim_prev = is_trim_marker(&src[body_start..]);
            if trim_prev {
                body_start += 1;
            }
            push_text(&mut nodes, &src[pos..open], trim_next, trim_prev);

            let comment_start = if trim_prev {
                body_start + src[body_start..].chars().next().map_or(0, char::len_utf8)
            } else {
                body_start
            };
            if src[comment_start..].starts_with("/*") {
                let (end, trim) = close_comment(src, comment_start + 2, line)?;
                trim_next = trim;
                pos = end;
                continue;
            }

            let close = find_close(src, body_start).ok_or_else(|| TemplateError::Parse {
                line,
                reason: "unclosed action".to_string(),
            })?;
            let mut body = &src[body_start..close];
            trim_next = false;
            if let Some(stripped) = body.strip_suffix('-') {
                if stripped.ends_with(char::is_whitespace) {
                    body = stripped;
                    trim_next = true;
                }
            }
            pos = close + 2;

            let body = body.trim();
            let command = tokenize(body, line)?;
            validate(&command, line)?;
            nodes.push(Node::Action { line, command });
        }

        Ok(Self { nodes })
    }

    /// Execute against `env`, exposed to the template as `.Env`.
    pub fn render(&self, env: &HashMap<String, String>) -> Result<String, TemplateError> {
        let mut out = String::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Action { line, command } => {
                    eval_command(command, env, *line)?.render(&mut out);
                }
            }
        }
        Ok(out)
    }
}

fn line_of(src: &str, offset: usize) -> usize {
    src[..offset].matches('\n').count() + 1
}

/// `-` followed by whitespace right after `{{`.
fn is_trim_marker(rest: &str) -> bool {
    let mut chars = rest.chars();
    chars.next() == Some('-') && chars.next().is_some_and(char::is_whitespace)
}

fn push_text(nodes: &mut Vec<Node>, text: &str, trim_start: bool, trim_end: bool) {
    let mut text = text;
    if trim_start {
        text = text.trim_start();
    }
    if trim_end {
        text = text.trim_end();
    }
    if !text.is_empty() {
        nodes.push(Node::Text(text.to_string()));
    }
}

/// Comment bodies are opaque: the first `*/` ends them and must be followed
/// by `}}` or ` -}}`. Returns the offset after the delimiter and whether the
/// following text is trimmed.
fn close_comment(src: &str, from: usize, line: usize) -> Result<(usize, bool), TemplateError> {
    let parse_err = |reason: &str| TemplateError::Parse {
        line,
        reason: reason.to_string(),
    };
    let end = src[from..]
        .find("*/")
        .map(|rel| from + rel + 2)
        .ok_or_else(|| parse_err("unclosed comment"))?;
    let rest = &src[end..];
    if rest.starts_with("}}") {
        return Ok((end + 2, false));
    }
    let mut chars = rest.chars();
    if let Some(space) = chars.next().filter(|c| c.is_whitespace()) {
        if chars.as_str().starts_with("-}}") {
            return Ok((end + space.len_utf8() + 3, true));
        }
    }
    Err(parse_err("comment ends before closing delimiter"))
}

/// Offset of the `}}` closing the action at `from`, skipping string literals.
fn find_close(src: &str, from: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                i += 1;
                while i < bytes.len() && bytes[i] != b'"' {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'`' => {
                i += 1;
                while i < bytes.len() && bytes[i] != b'`' {
                    i += 1;
                }
            }
            b'}' if bytes.get(i + 1) == Some(&b'}') => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

fn tokenize(body: &str, line: usize) -> Result<Vec<Token>, TemplateError> {
    let parse_err = |reason: String| TemplateError::Parse { line, reason };
    let mut tokens = Vec::new();
    let mut chars = body.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        match c {
            '.' => {
                let mut path = Vec::new();
                while chars.peek() == Some(&'.') {
                    chars.next();
                    let mut name = String::new();
                    while let Some(&n) = chars.peek() {
                        if n.is_alphanumeric() || n == '_' {
                            name.push(n);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    if name.is_empty() {
                        if path.is_empty() && chars.peek().is_none_or(|n| n.is_whitespace()) {
                            break;
                        }
                        return Err(parse_err("bad character in field chain".to_string()));
                    }
                    path.push(name);
                }
                tokens.push(Token::Field(path));
            }
            '"' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        None => return Err(parse_err("unterminated quoted string".to_string())),
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => value.push('\n'),
                            Some('t') => value.push('\t'),
                            Some('\\') => value.push('\\'),
                            Some('"') => value.push('"'),
                            Some(other) => {
                                return Err(parse_err(format!("unknown escape sequence: \\{}", other)));
                            }
                            None => return Err(parse_err("unterminated quoted string".to_string())),
                        },
                        Some(other) => value.push(other),
                    }
                }
                tokens.push(Token::Str(value));
            }
            '`' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        None => return Err(parse_err("unterminated raw quoted string".to_string())),
                        Some('`') => break,
                        Some(other) => value.push(other),
                    }
                }
                tokens.push(Token::Str(value));
            }
            '|' => return Err(parse_err("pipelines are not supported".to_string())),
            c if c.is_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if n.is_alphanumeric() || n == '_' {
                        name.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(name));
            }
            other => return Err(parse_err(format!("unexpected {:?} in command", other))),
        }
    }

    Ok(tokens)
}

fn validate(command: &[Token], line: usize) -> Result<(), TemplateError> {
    let parse_err = |reason: String| TemplateError::Parse { line, reason };
    match command.first() {
        None => Err(parse_err("missing value for command".to_string())),
        Some(Token::Ident(name)) => {
            if KEYWORDS.contains(&name.as_str()) {
                return Err(parse_err(format!("unsupported action {{{{{}}}}}", name)));
            }
            if name != "index" && name != "or" {
                return Err(parse_err(format!("function {:?} not defined", name)));
            }
            for arg in &command[1..] {
                if let Token::Ident(inner) = arg {
                    return Err(parse_err(format!(
                        "function {:?} cannot be used as an argument",
                        inner
                    )));
                }
            }
            Ok(())
        }
        Some(_) if command.len() > 1 => {
            Err(parse_err("can't give argument to non-function".to_string()))
        }
        Some(_) => Ok(()),
    }
}

fn eval_command<'e>(
    command: &[Token],
    env: &'e HashMap<String, String>,
    line: usize,
) -> Result<Value<'e>, TemplateError> {
    let exec_err = |reason: String| TemplateError::Exec { line, reason };

    let Some(Token::Ident(func)) = command.first() else {
        return match command.first() {
            Some(token) => eval_arg(token, env, line),
            None => Err(exec_err("empty command".to_string())),
        };
    };
    let args = command[1..]
        .iter()
        .map(|arg| eval_arg(arg, env, line))
        .collect::<Result<Vec<_>, _>>()?;

    match func.as_str() {
        "index" => match args.as_slice() {
            [Value::Env(map), Value::Text(key)] => {
                Ok(Value::Text(map.get(key).cloned().unwrap_or_default()))
            }
            [_, _] => Err(exec_err(
                "error calling index: can only index .Env by a string key".to_string(),
            )),
            _ => Err(exec_err(format!(
                "wrong number of args for index: want 2 got {}",
                args.len()
            ))),
        },
        "or" => {
            if args.is_empty() {
                return Err(exec_err(
                    "wrong number of args for or: want at least 1 got 0".to_string(),
                ));
            }
            let mut args = args;
            let pick = args.iter().position(Value::truthy).unwrap_or(args.len() - 1);
            Ok(args.swap_remove(pick))
        }
        other => Err(exec_err(format!("function {:?} not defined", other))),
    }
}

fn eval_arg<'e>(
    token: &Token,
    env: &'e HashMap<String, String>,
    line: usize,
) -> Result<Value<'e>, TemplateError> {
    match token {
        Token::Str(s) => Ok(Value::Text(s.clone())),
        Token::Ident(name) => Err(TemplateError::Exec {
            line,
            reason: format!("function {:?} cannot be used as an argument", name),
        }),
        Token::Field(path) => match path.as_slice() {
            [] => Ok(Value::Data(env)),
            [root] if root == "Env" => Ok(Value::Env(env)),
            [root, key] if root == "Env" => Ok(env
                .get(key)
                .cloned()
                .map_or(Value::NoValue, Value::Text)),
            [root, _, field, ..] if root == "Env" => Err(TemplateError::Exec {
                line,
                reason: format!("can't evaluate field {} in type string", field),
            }),
            [_] => Ok(Value::NoValue),
            [root, ..] => Err(TemplateError::Exec {
                line,
                reason: format!("nil pointer evaluating interface {{}}.{}", root),
            }),
        },
    }
}
