use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Scalar type tags for the closed set of bridgeable types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Bool,
}

impl ScalarType {
    /// Every bridgeable type, in declaration order.
    pub const ALL: [ScalarType; 7] = [
        ScalarType::I8,
        ScalarType::I16,
        ScalarType::I32,
        ScalarType::I64,
        ScalarType::F32,
        ScalarType::F64,
        ScalarType::Bool,
    ];

    /// Returns the Rust-facing name of the type.
    pub fn name(self) -> &'static str {
        match self {
            ScalarType::I8 => "i8",
            ScalarType::I16 => "i16",
            ScalarType::I32 => "i32",
            ScalarType::I64 => "i64",
            ScalarType::F32 => "f32",
            ScalarType::F64 => "f64",
            ScalarType::Bool => "bool",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Untyped storage form of a scalar.
///
/// Each variant belongs to exactly one scalar type, so a stored value always
/// knows what it decodes to. Empty slots are represented as `None` around a
/// `StorageValue`, never as a variant.
///
/// Floats serialize as their IEEE 754 bit patterns, so every NaN payload
/// (signaling ones included) survives encoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StorageValue {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(#[serde(with = "f32_bits")] f32),
    F64(#[serde(with = "f64_bits")] f64),
    Bool(bool),
}

/// Encodes an `f32` as its `u32` bit pattern.
mod f32_bits {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(value.to_bits())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
        u32::deserialize(deserializer).map(f32::from_bits)
    }
}

/// Encodes an `f64` as its `u64` bit pattern.
mod f64_bits {
    use super::*;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.to_bits())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        u64::deserialize(deserializer).map(f64::from_bits)
    }
}

impl StorageValue {
    /// Returns the tag of the scalar type this value was produced from.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            StorageValue::I8(_) => ScalarType::I8,
            StorageValue::I16(_) => ScalarType::I16,
            StorageValue::I32(_) => ScalarType::I32,
            StorageValue::I64(_) => ScalarType::I64,
            StorageValue::F32(_) => ScalarType::F32,
            StorageValue::F64(_) => ScalarType::F64,
            StorageValue::Bool(_) => ScalarType::Bool,
        }
    }

    /// Serializes this value to CBOR bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf).expect("serialization should not fail");
        buf
    }

    /// Deserializes a value from CBOR bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, ciborium::de::Error<std::io::Error>> {
        ciborium::from_reader(data)
    }
}

/// Error raised when a storage value is decoded as the wrong scalar type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: ScalarType,
        found: ScalarType,
    },
}

mod sealed {
    /// Closes [`Scalar`](super::Scalar) to the types listed in this module.
    pub trait Sealed {}
}

/// A primitive type that can be held by an [`OptionalScalar`](crate::OptionalScalar).
///
/// Implemented for `i8`, `i16`, `i32`, `i64`, `f32`, `f64` and `bool` only.
/// Conversions are pure: `from_storage(v.to_storage()) == v` for every value,
/// with floats preserved bit for bit.
pub trait Scalar: sealed::Sealed + Copy + fmt::Debug + PartialEq + Send + Sync + 'static {
    const SCALAR_TYPE: ScalarType;

    /// Converts the value to its storage form.
    fn to_storage(self) -> StorageValue;

    /// Converts a storage value back, checking its tag.
    fn try_from_storage(value: StorageValue) -> Result<Self, BridgeError>;

    /// Converts a storage value back.
    ///
    /// # Panics
    ///
    /// Panics if `value` was not produced by `to_storage` for this type. A
    /// mismatch means the slot's contents disagree with the declared field
    /// type, which callers cannot recover from.
    #[track_caller]
    fn from_storage(value: StorageValue) -> Self {
        match Self::try_from_storage(value) {
            Ok(v) => v,
            Err(err) => panic!("{err}"),
        }
    }
}

macro_rules! impl_scalar {
    ($t:ty, $variant:ident) => {
        impl sealed::Sealed for $t {}

        impl Scalar for $t {
            const SCALAR_TYPE: ScalarType = ScalarType::$variant;

            fn to_storage(self) -> StorageValue {
                StorageValue::$variant(self)
            }

            fn try_from_storage(value: StorageValue) -> Result<Self, BridgeError> {
                match value {
                    StorageValue::$variant(v) => Ok(v),
                    other => Err(BridgeError::TypeMismatch {
                        expected: ScalarType::$variant,
                        found: other.scalar_type(),
                    }),
                }
            }
        }
    };
}

impl_scalar!(i8, I8);
impl_scalar!(i16, I16);
impl_scalar!(i32, I32);
impl_scalar!(i64, I64);
impl_scalar!(f32, F32);
impl_scalar!(f64, F64);
impl_scalar!(bool, Bool);

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T: Scalar>(v: T) -> T {
        T::from_storage(v.to_storage())
    }

    #[test]
    fn integer_roundtrip_extremes() {
        for v in [i8::MIN, -1, 0, 1, i8::MAX] {
            assert_eq!(roundtrip(v), v);
        }
        for v in [i16::MIN, 0, i16::MAX] {
            assert_eq!(roundtrip(v), v);
        }
        for v in [i32::MIN, 0, i32::MAX] {
            assert_eq!(roundtrip(v), v);
        }
        for v in [i64::MIN, 0, i64::MAX] {
            assert_eq!(roundtrip(v), v);
        }
    }

    #[test]
    fn bool_roundtrip() {
        assert!(roundtrip(true));
        assert!(!roundtrip(false));
    }

    #[test]
    fn float_roundtrip_is_bit_exact() {
        let nan = f32::from_bits(0x7fc0_1234);
        assert_eq!(roundtrip(nan).to_bits(), nan.to_bits());
        assert_eq!(roundtrip(-0.0f32).to_bits(), (-0.0f32).to_bits());
        assert_eq!(roundtrip(f32::INFINITY), f32::INFINITY);

        let nan = f64::from_bits(0x7ff8_0000_dead_beef);
        assert_eq!(roundtrip(nan).to_bits(), nan.to_bits());
        assert_eq!(roundtrip(-0.0f64).to_bits(), (-0.0f64).to_bits());
        assert_eq!(roundtrip(f64::MIN_POSITIVE), f64::MIN_POSITIVE);
    }

    #[test]
    fn storage_tag_matches_scalar_type() {
        assert_eq!(7i8.to_storage().scalar_type(), i8::SCALAR_TYPE);
        assert_eq!(7i16.to_storage().scalar_type(), i16::SCALAR_TYPE);
        assert_eq!(7i32.to_storage().scalar_type(), i32::SCALAR_TYPE);
        assert_eq!(7i64.to_storage().scalar_type(), i64::SCALAR_TYPE);
        assert_eq!(7.0f32.to_storage().scalar_type(), f32::SCALAR_TYPE);
        assert_eq!(7.0f64.to_storage().scalar_type(), f64::SCALAR_TYPE);
        assert_eq!(true.to_storage().scalar_type(), bool::SCALAR_TYPE);
    }

    #[test]
    fn widths_do_not_alias() {
        // Same numeric value, different widths: still distinct storage values.
        assert_ne!(1i32.to_storage(), 1i64.to_storage());
        assert_eq!(
            i64::try_from_storage(1i32.to_storage()),
            Err(BridgeError::TypeMismatch {
                expected: ScalarType::I64,
                found: ScalarType::I32,
            })
        );
        assert!(f64::try_from_storage(1.0f32.to_storage()).is_err());
        assert!(bool::try_from_storage(1i8.to_storage()).is_err());
    }

    #[test]
    fn each_tag_decodes_only_as_its_own_type() {
        let samples = [
            1i8.to_storage(),
            1i16.to_storage(),
            1i32.to_storage(),
            1i64.to_storage(),
            1.0f32.to_storage(),
            1.0f64.to_storage(),
            true.to_storage(),
        ];
        for value in samples {
            let tag = value.scalar_type();
            assert_eq!(i8::try_from_storage(value).is_ok(), tag == ScalarType::I8);
            assert_eq!(i16::try_from_storage(value).is_ok(), tag == ScalarType::I16);
            assert_eq!(i32::try_from_storage(value).is_ok(), tag == ScalarType::I32);
            assert_eq!(i64::try_from_storage(value).is_ok(), tag == ScalarType::I64);
            assert_eq!(f32::try_from_storage(value).is_ok(), tag == ScalarType::F32);
            assert_eq!(f64::try_from_storage(value).is_ok(), tag == ScalarType::F64);
            assert_eq!(bool::try_from_storage(value).is_ok(), tag == ScalarType::Bool);
        }
    }

    #[test]
    #[should_panic(expected = "type mismatch: expected bool, found i64")]
    fn from_storage_mismatch_is_fatal() {
        let _ = bool::from_storage(42i64.to_storage());
    }

    #[test]
    fn scalar_type_names() {
        let names: Vec<_> = ScalarType::ALL.iter().map(|t| t.to_string()).collect();
        assert_eq!(names, ["i8", "i16", "i32", "i64", "f32", "f64", "bool"]);
    }

    #[test]
    fn storage_value_cbor_roundtrip() {
        let values = [
            StorageValue::I8(-5),
            StorageValue::I64(i64::MIN),
            StorageValue::F32(3.25),
            StorageValue::F64(2.5e300),
            StorageValue::Bool(false),
        ];
        for value in values {
            let bytes = value.to_bytes();
            let recovered = StorageValue::from_bytes(&bytes).unwrap();
            assert_eq!(recovered, value);
        }
    }

    #[test]
    fn storage_value_cbor_keeps_nan_payloads() {
        let signaling = f32::from_bits(0x7f80_0001);
        let bytes = StorageValue::F32(signaling).to_bytes();
        match StorageValue::from_bytes(&bytes).unwrap() {
            StorageValue::F32(v) => assert_eq!(v.to_bits(), 0x7f80_0001),
            other => panic!("expected F32, got {other:?}"),
        }

        let signaling = f64::from_bits(0x7ff0_0000_0000_0001);
        let bytes = StorageValue::F64(signaling).to_bytes();
        match StorageValue::from_bytes(&bytes).unwrap() {
            StorageValue::F64(v) => assert_eq!(v.to_bits(), 0x7ff0_0000_0000_0001),
            other => panic!("expected F64, got {other:?}"),
        }

        let bytes = StorageValue::F32(-0.0).to_bytes();
        match StorageValue::from_bytes(&bytes).unwrap() {
            StorageValue::F32(v) => assert_eq!(v.to_bits(), (-0.0f32).to_bits()),
            other => panic!("expected F32, got {other:?}"),
        }
    }

    #[test]
    fn storage_value_rejects_garbage() {
        assert!(StorageValue::from_bytes(&[0xff, 0x00]).is_err());
    }
}
