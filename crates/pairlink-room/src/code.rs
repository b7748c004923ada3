//! Room code generation.

use pairlink_protocol::RoomCode;
use rand::Rng;

/// Characters a room code is drawn from: digits and uppercase letters, so
/// codes are easy to read out loud and type on a phone.
const ALPHANUMERIC_CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generates a random [`RoomCode::LEN`]-character room code.
///
/// Uniqueness is not guaranteed here; the room manager checks each
/// candidate against the live rooms and draws again on collision.
pub fn generate_room_code<R: Rng + ?Sized>(rng: &mut R) -> RoomCode {
    let code: String = (0..RoomCode::LEN)
        .map(|_| {
            let idx = rng.random_range(0..ALPHANUMERIC_CHARS.len());
            ALPHANUMERIC_CHARS[idx] as char
        })
        .collect();
    RoomCode::new(code)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_generate_room_code_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let code = generate_room_code(&mut rng);
            assert_eq!(code.as_str().len(), RoomCode::LEN);
            assert!(
                code.as_str()
                    .bytes()
                    .all(|b| b.is_ascii_digit() || b.is_ascii_uppercase()),
                "unexpected character in {code}"
            );
        }
    }

    #[test]
    fn test_generate_room_code_is_reproducible_with_seed() {
        let a = generate_room_code(&mut StdRng::seed_from_u64(42));
        let b = generate_room_code(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_generate_room_code_varies() {
        let mut rng = StdRng::seed_from_u64(9);
        let a = generate_room_code(&mut rng);
        let b = generate_room_code(&mut rng);
        assert_ne!(a, b);
    }
}
