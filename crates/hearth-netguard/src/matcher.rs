/// Test whether the leading `prefix_len` bits of `addr` equal those of `network`.
///
/// Both slices must come from the same address family. Cross-family callers
/// are filtered out in [`Cidr::contains`](crate::cidr::Cidr::contains) before
/// reaching this function. A prefix longer than the slices compares every
/// available bit and nothing more, and slices of different lengths compare
/// only their common leading bytes.
pub fn prefix_match(addr: &[u8], network: &[u8], prefix_len: u8) -> bool {
    let full_bytes = usize::from(prefix_len / 8);
    let remainder = prefix_len % 8;
    let full_bytes_in_range = full_bytes.min(addr.len()).min(network.len());

    if addr[..full_bytes_in_range] != network[..full_bytes_in_range] {
        return false;
    }

    if remainder != 0 {
        let (Some(a), Some(n)) = (addr.get(full_bytes), network.get(full_bytes)) else {
            return true;
        };
        let mask = (0xFFu16 << (8 - remainder)) as u8;
        if a & mask != n & mask {
            return false;
        }
    }

    true
}
