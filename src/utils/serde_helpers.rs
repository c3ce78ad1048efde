//! Serde glue for the string-encoded primitives (`0x` addresses and hashes,
//! decimal amounts). JSON-RPC payloads and snapshot files both go through
//! these impls so the two encodings never drift apart.

/// Implement `Serialize`/`Deserialize` through `Display` and a string parser.
///
/// The parser is given explicitly because some types (`U256`) print decimal
/// but parse hex through `FromStr`.
macro_rules! serde_via_str {
    ($t:ty, $parse:expr) => {
        impl ::serde::Serialize for $t {
            fn serialize<S>(&self, s: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                s.collect_str(self)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $t {
            fn deserialize<D>(d: D) -> ::std::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let s = <String as ::serde::Deserialize>::deserialize(d)?;
                $parse(&s).map_err(|e| {
                    <D::Error as ::serde::de::Error>::custom(format!("invalid value {:?}: {:?}", s, e))
                })
            }
        }
    };
}

pub(crate) use serde_via_str;

/// Decode a `0x`-prefixed (or bare) hex string into exactly `N` bytes.
pub fn decode_fixed_hex<const N: usize>(s: &str) -> Result<[u8; N], String> {
    let raw = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    let bytes = hex::decode(raw).map_err(|e| e.to_string())?;
    if bytes.len() != N {
        return Err(format!("expected {} bytes, got {}", N, bytes.len()));
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_accepts_prefix_and_rejects_bad_length() {
        assert_eq!(decode_fixed_hex::<2>("0xabcd").unwrap(), [0xab, 0xcd]);
        assert_eq!(decode_fixed_hex::<2>("ABCD").unwrap(), [0xab, 0xcd]);
        assert!(decode_fixed_hex::<2>("0xabcdef").is_err());
        assert!(decode_fixed_hex::<2>("0xzz").is_err());
    }
}
