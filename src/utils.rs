use crate::types::MessageId;

/// Joins an iterator of [std::fmt::Display]'ables into an output writable
pub(crate) fn iter_join_onto<W, I, T>(mut w: W, iter: I, delim: &str) -> std::fmt::Result
where
    W: std::fmt::Write,
    I: IntoIterator<Item = T>,
    T: std::fmt::Display,
{
    let mut it = iter.into_iter().peekable();
    while let Some(n) = it.next() {
        write!(w, "{}", n)?;
        if it.peek().is_some() {
            write!(w, "{}", delim)?;
        }
    }
    Ok(())
}

/// Joins an iterator of [std::fmt::Display]'ables to a new [std::string::String].
pub(crate) fn iter_join<I, T>(iter: I, delim: &str) -> String
where
    I: IntoIterator<Item = T>,
    T: std::fmt::Display,
{
    let mut s = String::new();
    let _ = iter_join_onto(&mut s, iter, delim);
    s
}

/// A sequence set naming exactly `ids`, collapsing consecutive runs: `1:3,7,9:10`.
pub(crate) fn sequence_set(ids: &[MessageId]) -> String {
    let mut sorted = ids.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut runs: Vec<(MessageId, MessageId)> = Vec::new();
    for id in sorted {
        match runs.last_mut() {
            Some((_, end)) if end.checked_add(1) == Some(id) => *end = id,
            _ => runs.push((id, id)),
        }
    }
    iter_join(
        runs.iter().map(|&(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{}:{}", start, end)
            }
        }),
        ",",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_sets_collapse_runs() {
        assert_eq!(sequence_set(&[1]), "1");
        assert_eq!(sequence_set(&[3, 1, 2, 7, 10, 9]), "1:3,7,9:10");
        assert_eq!(sequence_set(&[5, 5, 6]), "5:6");
        assert_eq!(sequence_set(&[]), "");
    }

    #[test]
    fn join() {
        assert_eq!(iter_join(["a", "b", "c"], " "), "a b c");
        assert_eq!(iter_join(Vec::<u32>::new(), ","), "");
    }
}
