//! Rewrites format-style placeholders into named bind variables.
//!
//! Statements arrive with `%s` (positional) or `%(name)s` (named)
//! placeholders. The driver wants `:name` bind variables, so positional
//! placeholder `i` becomes `:argI` and a named one becomes `:name`. A literal
//! percent sign is written `%%` and comes out as `%`.

use crate::error::RewriteError;

/// Shape of the parameters a statement is executed with.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameShape<'a> {
    /// No parameters at all. The text is passed through without placeholder
    /// processing, so `%` needs no escaping.
    Unbound,
    Positional(usize),
    Named(Vec<&'a str>),
}

/// A statement in driver bind syntax.
#[derive(Debug, Clone, PartialEq)]
pub struct RewrittenQuery {
    pub sql: String,
    /// Bind names in the order (or key order) the parameters were supplied.
    pub bind_names: Vec<String>,
}

/// Strips one trailing `;` or `/`.
///
/// The driver rejects them, but callers keep them in their text so the same
/// statement can be fed to SQL*Plus.
pub fn strip_terminator(sql: &str) -> &str {
    sql.strip_suffix(';')
        .or_else(|| sql.strip_suffix('/'))
        .unwrap_or(sql)
}

pub fn positional_bind_name(index: usize) -> String {
    format!("arg{index}")
}

/// Rewrites `sql` for the given parameter shape.
pub fn rewrite(sql: &str, shape: FrameShape<'_>) -> Result<RewrittenQuery, RewriteError> {
    let sql = strip_terminator(sql);
    match shape {
        FrameShape::Unbound => Ok(RewrittenQuery {
            sql: sql.to_string(),
            bind_names: Vec::new(),
        }),
        FrameShape::Positional(count) => {
            let mut next = 0usize;
            let rewritten = substitute(sql, |placeholder, _| match placeholder {
                Placeholder::Positional => {
                    let name = positional_bind_name(next);
                    next += 1;
                    Ok(name)
                }
                Placeholder::Named(name) => Err(RewriteError::NamedWithSequence(name.to_string())),
            })?;
            if next != count {
                return Err(RewriteError::CountMismatch {
                    expected: next,
                    actual: count,
                });
            }
            Ok(RewrittenQuery {
                sql: rewritten,
                bind_names: (0..count).map(positional_bind_name).collect(),
            })
        }
        FrameShape::Named(keys) => {
            let rewritten = substitute(sql, |placeholder, position| match placeholder {
                Placeholder::Named(name) if keys.contains(&name) => Ok(name.to_string()),
                Placeholder::Named(name) => Err(RewriteError::MissingParameter(name.to_string())),
                Placeholder::Positional => Err(RewriteError::PositionalWithMapping(position)),
            })?;
            Ok(RewrittenQuery {
                sql: rewritten,
                bind_names: keys.into_iter().map(str::to_string).collect(),
            })
        }
    }
}

enum Placeholder<'s> {
    Positional,
    Named(&'s str),
}

/// Walks `sql`, replacing each placeholder with `:` plus the name returned
/// by `bind` (which also receives the placeholder's byte offset).
fn substitute<'s, F>(sql: &'s str, mut bind: F) -> Result<String, RewriteError>
where
    F: FnMut(Placeholder<'s>, usize) -> Result<String, RewriteError>,
{
    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len() + 16);
    let mut copied = 0usize;

    while let Some(offset) = sql[copied..].find('%') {
        let start = copied + offset;
        out.push_str(&sql[copied..start]);
        copied = match bytes.get(start + 1) {
            Some(b'%') => {
                out.push('%');
                start + 2
            }
            Some(b's') => {
                out.push(':');
                out.push_str(&bind(Placeholder::Positional, start)?);
                start + 2
            }
            Some(b'(') => {
                let close = sql[start + 2..]
                    .find(')')
                    .map(|p| start + 2 + p)
                    .ok_or(RewriteError::IncompletePlaceholder(start))?;
                match bytes.get(close + 1) {
                    Some(b's') => {}
                    Some(_) => {
                        return Err(RewriteError::UnsupportedConversion {
                            conversion: sql[close + 1..].chars().next().unwrap_or_default(),
                            position: close + 1,
                        })
                    }
                    None => return Err(RewriteError::IncompletePlaceholder(start)),
                }
                out.push(':');
                out.push_str(&bind(Placeholder::Named(&sql[start + 2..close]), start)?);
                close + 2
            }
            Some(_) => {
                return Err(RewriteError::UnsupportedConversion {
                    conversion: sql[start + 1..].chars().next().unwrap_or_default(),
                    position: start,
                })
            }
            None => return Err(RewriteError::IncompletePlaceholder(start)),
        };
    }
    out.push_str(&sql[copied..]);
    Ok(out)
}
