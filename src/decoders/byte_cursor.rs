// src/decoders/byte_cursor.rs

use super::DecodeError;
use solana_sdk::pubkey::Pubkey;

pub const PUBKEY_LEN: usize = 32;

/// Lecteur little-endian borné sur une tranche d'octets.
///
/// C'est le seul endroit du crate qui manipule des offsets bruts : tous les
/// décodeurs lisent au travers de ce curseur, ce qui rend un accès hors
/// limites impossible. Une lecture réussie avance la position ; après une
/// erreur, la position n'est plus garantie et le décodage doit s'arrêter.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Construit un curseur déjà positionné à `offset`.
    pub fn at(data: &'a [u8], offset: usize) -> Result<Self, DecodeError> {
        let mut cursor = Self::new(data);
        cursor.skip(offset)?;
        Ok(cursor)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let bytes = self
            .position
            .checked_add(n)
            .and_then(|end| self.data.get(self.position..end))
            .ok_or(DecodeError::Truncated {
                offset: self.position,
                needed: n,
                available: self.remaining(),
            })?;
        self.position += n;
        Ok(bytes)
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        self.take(n)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        self.take(n).map(|_| ())
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_array::<1>()?[0])
    }

    /// N'importe quel octet non nul vaut `true`.
    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Lit un u128 stocké en deux mots de 64 bits (bas puis haut).
    /// Le découpage n'existe que dans le format binaire, jamais en mémoire.
    pub fn read_u128_split(&mut self) -> Result<u128, DecodeError> {
        let lo = self.read_u64()?;
        let hi = self.read_u64()?;
        Ok(((hi as u128) << 64) | lo as u128)
    }

    pub fn read_pubkey(&mut self) -> Result<Pubkey, DecodeError> {
        Ok(Pubkey::new_from_array(self.read_array::<PUBKEY_LEN>()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_little_endian_fields_in_order() {
        let mut data = Vec::new();
        data.push(0xAB);
        data.extend_from_slice(&0x1234u16.to_le_bytes());
        data.extend_from_slice(&0xDEADBEEFu32.to_le_bytes());
        data.extend_from_slice(&(-18973i32).to_le_bytes());
        data.extend_from_slice(&u64::MAX.to_le_bytes());

        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_u8().unwrap(), 0xAB);
        assert_eq!(cursor.read_u16().unwrap(), 0x1234);
        assert_eq!(cursor.read_u32().unwrap(), 0xDEADBEEF);
        assert_eq!(cursor.read_i32().unwrap(), -18973);
        assert_eq!(cursor.read_u64().unwrap(), u64::MAX);
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(cursor.position(), data.len());
    }

    #[test]
    fn u128_is_rebuilt_from_lo_and_hi_words() {
        let mut data = Vec::new();
        data.extend_from_slice(&7u64.to_le_bytes());
        data.extend_from_slice(&1u64.to_le_bytes());
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_u128_split().unwrap(), (1u128 << 64) + 7);
    }

    #[test]
    fn short_read_reports_truncation_with_context() {
        let data = [1u8, 2, 3];
        let mut cursor = ByteCursor::new(&data);
        cursor.skip(1).unwrap();
        assert_eq!(
            cursor.read_u32(),
            Err(DecodeError::Truncated { offset: 1, needed: 4, available: 2 })
        );
    }

    #[test]
    fn huge_skip_does_not_overflow() {
        let data = [0u8; 8];
        let mut cursor = ByteCursor::new(&data);
        cursor.skip(4).unwrap();
        assert!(matches!(cursor.skip(usize::MAX), Err(DecodeError::Truncated { .. })));
        assert!(ByteCursor::at(&data, 9).is_err());
        assert_eq!(ByteCursor::at(&data, 8).unwrap().remaining(), 0);
    }

    #[test]
    fn read_bytes_borrows_from_the_source() {
        let data = [9u8, 8, 7, 6];
        let mut cursor = ByteCursor::new(&data);
        let head = cursor.read_bytes(3).unwrap();
        assert_eq!(head, &[9, 8, 7]);
        assert_eq!(cursor.read_bytes(0).unwrap(), &[] as &[u8]);
        assert_eq!(cursor.remaining(), 1);
    }
}
