//! Payload chunking for multi-APDU signing commands.

/// Splits `message` into chunks of at most `max_chunk_size` bytes.
///
/// A non-zero `account_id` is prepended as 4 big-endian bytes before
/// splitting, matching the first-chunk `FIRST_ACCOUNT_ID` P1 role. Chunks are
/// contiguous and non-overlapping; concatenating them reproduces the input
/// (plus the optional prefix).
///
/// Empty input yields exactly one empty chunk: a signing session must always
/// send at least one command so the device sees a first/last chunk pair even
/// for a zero-length message.
pub fn prepare_chunks(account_id: u32, message: &[u8], max_chunk_size: usize) -> Vec<Vec<u8>> {
    assert!(max_chunk_size > 0, "chunk size must be non-zero");

    let mut buffer = Vec::with_capacity(message.len() + 4);
    if account_id != 0 {
        buffer.extend_from_slice(&account_id.to_be_bytes());
    }
    buffer.extend_from_slice(message);

    if buffer.is_empty() {
        return vec![Vec::new()];
    }

    buffer
        .chunks(max_chunk_size)
        .map(|chunk| chunk.to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apdu::CHUNK_SIZE;
    use proptest::prelude::*;

    fn reassemble(chunks: &[Vec<u8>]) -> Vec<u8> {
        chunks.iter().flatten().copied().collect()
    }

    #[test]
    fn empty_message_yields_one_empty_chunk() {
        let chunks = prepare_chunks(0, &[], CHUNK_SIZE);
        assert_eq!(chunks, vec![Vec::<u8>::new()]);
    }

    #[test]
    fn boundary_lengths() {
        for (len, expected_chunks) in [
            (1usize, 1usize),
            (CHUNK_SIZE - 1, 1),
            (CHUNK_SIZE, 1),
            (CHUNK_SIZE + 1, 2),
            (5 * CHUNK_SIZE, 5),
        ] {
            let message = vec![0xAB; len];
            let chunks = prepare_chunks(0, &message, CHUNK_SIZE);
            assert_eq!(chunks.len(), expected_chunks, "length {len}");
            assert!(chunks.iter().all(|c| c.len() <= CHUNK_SIZE));
            assert_eq!(reassemble(&chunks), message);
        }
    }

    #[test]
    fn account_id_is_prepended_big_endian() {
        let message = vec![0x01, 0x02, 0x03];
        let chunks = prepare_chunks(0x0102_0304, &message, CHUNK_SIZE);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0], vec![0x01, 0x02, 0x03, 0x04, 0x01, 0x02, 0x03]);
    }

    #[test]
    fn zero_account_id_adds_no_prefix() {
        let message = vec![0xFF; 10];
        let chunks = prepare_chunks(0, &message, CHUNK_SIZE);
        assert_eq!(chunks[0], message);
    }

    #[test]
    fn account_id_prefix_counts_toward_chunk_budget() {
        // 4 prefix bytes + CHUNK_SIZE - 2 message bytes spill into a second chunk.
        let message = vec![0x00; CHUNK_SIZE - 2];
        let chunks = prepare_chunks(7, &message, CHUNK_SIZE);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), CHUNK_SIZE);
        assert_eq!(chunks[1].len(), 2);
    }

    proptest! {
        #[test]
        fn roundtrip(
            account_id in any::<u32>(),
            message in proptest::collection::vec(any::<u8>(), 0..2048),
            max_chunk_size in 1usize..512,
        ) {
            let chunks = prepare_chunks(account_id, &message, max_chunk_size);
            prop_assert!(!chunks.is_empty());
            prop_assert!(chunks.iter().all(|c| c.len() <= max_chunk_size));

            let mut expected = Vec::new();
            if account_id != 0 {
                expected.extend_from_slice(&account_id.to_be_bytes());
            }
            expected.extend_from_slice(&message);
            prop_assert_eq!(reassemble(&chunks), expected);
        }
    }
}
