use crate::syntax::Syntax;

/// Per-line classification facts shared by the parser states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LineFacts {
    /// Byte offset where a comment starts, if any. Zero for full-line
    /// comments.
    pub comment_start: Option<usize>,
    /// Whether the line is a comment from its first non-blank character.
    pub is_full_comment: bool,
}

/// Locate comments on a line.
///
/// Inline prefixes only count when at the start of the line or preceded by
/// whitespace. Candidate positions for each prefix are advanced in rounds and
/// the leftmost qualifying hit of a round wins, so an earlier non-qualifying
/// occurrence of one prefix cannot mask a later qualifying one of another.
pub(crate) fn classify(line: &str, syntax: &Syntax) -> LineFacts {
    let mut comment_start: Option<usize> = None;

    if !syntax.inline_comment_prefixes.is_empty() {
        let mut positions: Vec<(usize, Option<usize>)> = syntax
            .inline_comment_prefixes
            .iter()
            .enumerate()
            .map(|(i, _)| (i, None))
            .collect();
        while comment_start.is_none() && !positions.is_empty() {
            let mut round_best: Option<usize> = None;
            let mut next_positions = Vec::with_capacity(positions.len());
            for (prefix_idx, last) in positions {
                let prefix = &syntax.inline_comment_prefixes[prefix_idx];
                let search_from = last.map(|l| l + 1).unwrap_or(0);
                let found = line
                    .get(search_from..)
                    .and_then(|rest| rest.find(prefix.as_str()))
                    .map(|off| search_from + off);
                if let Some(idx) = found {
                    let qualifies = idx == 0
                        || line[..idx]
                            .chars()
                            .next_back()
                            .is_some_and(char::is_whitespace);
                    if qualifies {
                        round_best = Some(round_best.map_or(idx, |b: usize| b.min(idx)));
                    }
                    next_positions.push((prefix_idx, Some(idx)));
                }
            }
            comment_start = round_best;
            positions = next_positions;
        }
    }

    let mut is_full_comment = false;
    for prefix in &syntax.comment_prefixes {
        if line.trim_end().starts_with(prefix.as_str()) {
            comment_start = Some(0);
            is_full_comment = true;
            break;
        }
    }

    LineFacts {
        comment_start,
        is_full_comment,
    }
}

/// Leading-whitespace width of a line, the continuation criterion.
pub(crate) fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}
