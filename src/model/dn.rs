//! Distinguished name helpers.

use regex::{Captures, Regex};

/// Rename the last relative name of `dn` that starts with `rn_prefix`.
///
/// `uni/infra/funcprof/accbundle-PG1` with prefix `accbundle-` and name
/// `PG2` becomes `uni/infra/funcprof/accbundle-PG2`. Returns `None` if the
/// DN does not end in an RN with that prefix.
pub fn rename_leaf(dn: &str, rn_prefix: &str, new_name: &str) -> Option<String> {
    let pattern = format!(r"(?P<head>(?:^|/){})[^/]*$", regex::escape(rn_prefix));
    let re = Regex::new(&pattern).ok()?;

    if !re.is_match(dn) {
        return None;
    }

    let renamed = re.replace(dn, |caps: &Captures| format!("{}{new_name}", &caps["head"]));
    Some(renamed.into_owned())
}
