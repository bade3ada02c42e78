pub const MIN_NAME_SIZE: usize = 1;
pub const MAX_NAME_SIZE: usize = 63;

/// An account name is a dot separated list of sub-names, e.g. `alice` or `savings.alice`.
/// Lowercase letters, digits and `-` only; it starts with a letter and ends alphanumeric.
pub fn is_valid_account_name(name: &str) -> bool {
    if name.len() < MIN_NAME_SIZE || name.len() > MAX_NAME_SIZE {
        return false;
    }
    let bytes = name.as_bytes();
    if !bytes[0].is_ascii_lowercase() {
        return false;
    }
    let last = bytes[bytes.len() - 1];
    if !(last.is_ascii_lowercase() || last.is_ascii_digit()) {
        return false;
    }

    let (subname, supername) = match name.find('.') {
        Some(dot) => (&name[..dot], Some(&name[dot + 1..])),
        None => (name, None),
    };
    if let Some(supername) = supername {
        if !is_valid_account_name(supername) {
            return false;
        }
    }
    subname
        .bytes()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == b'-')
}
