use crate::error::CollaboratorError;
use crate::output::RotationToken;
use std::cmp::Ordering;

/// Decides which outputs are parts of the same rotated log and in which
/// order they were written.
pub trait RotationComparer {
    fn same_rotated_log(
        &self,
        a: &RotationToken,
        b: &RotationToken,
    ) -> Result<bool, CollaboratorError>;

    fn compare_order(
        &self,
        a: &RotationToken,
        b: &RotationToken,
    ) -> Result<Ordering, CollaboratorError>;
}

/// Tokens with the same `log` belong together; parts are ordered naturally,
/// so `app.9.log` sorts before `app.10.log`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaturalRotationComparer;

impl RotationComparer for NaturalRotationComparer {
    fn same_rotated_log(
        &self,
        a: &RotationToken,
        b: &RotationToken,
    ) -> Result<bool, CollaboratorError> {
        Ok(a.log == b.log)
    }

    fn compare_order(
        &self,
        a: &RotationToken,
        b: &RotationToken,
    ) -> Result<Ordering, CollaboratorError> {
        Ok(natural_cmp(&a.part, &b.part))
    }
}

/// Compares strings treating runs of ASCII digits as numbers.
pub(crate) fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.as_bytes();
    let mut b = b.as_bytes();

    loop {
        match (a.first(), b.first()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let (na, rest_a) = split_digits(a);
                let (nb, rest_b) = split_digits(b);
                let na = trim_zeros(na);
                let nb = trim_zeros(nb);
                let ord = na.len().cmp(&nb.len()).then_with(|| na.cmp(nb));
                if ord != Ordering::Equal {
                    return ord;
                }
                a = rest_a;
                b = rest_b;
            }
            (Some(x), Some(y)) => {
                if x != y {
                    return x.cmp(y);
                }
                a = &a[1..];
                b = &b[1..];
            }
        }
    }
}

fn split_digits(s: &[u8]) -> (&[u8], &[u8]) {
    let n = s.iter().take_while(|c| c.is_ascii_digit()).count();
    s.split_at(n)
}

fn trim_zeros(s: &[u8]) -> &[u8] {
    let n = s.iter().take_while(|c| **c == b'0').count();
    &s[n..]
}
