// Copyright 2017 Michael Benfield <mike.benfield@gmail.com>
// This file is part of Attalus. You may distribute and/or modify Attalus under
// the terms of the GNU General Public License as published by the Free Sofware
// Foundation, either version 3 of the license or (at your option) any later
// version. You should have received a copy of the GNU General Public License
// along with Attalus. If not, see <http://www.gnu.org/licenses/>.

pub fn to16(lo: u8, hi: u8) -> u16 {
    ((hi as u16) << 8) | (lo as u16)
}

pub fn to8(x: u16) -> (u8, u8) {
    ((x & 0xFF) as u8, ((x & 0xFF00) >> 8) as u8)
}

pub fn set_bit(dest: &mut u8, bit: u8) {
    *dest |= 1 << bit;
}

pub fn clear_bit(dest: &mut u8, bit: u8) {
    *dest &= !(1 << bit);
}

//// Deriving help for large fixed-size arrays, which `serde_derive` of this
//// vintage does not implement `Serialize`/`Deserialize` for directly.
////
//// The trick: define a private "derive" struct whose large arrays are
//// written as nested arrays of at most 32 elements each (the largest size
//// serde_derive implements directly), transmute to/from it for
//// (de)serialization, and forward `Hash`/`PartialEq` the same way so that
//// derived impls stay consistent with the real field layout.

macro_rules! impl_serde_via {
    ($my_type:ty, $other_type:ty) => {
        impl<'de> ::serde::Deserialize<'de> for $my_type {
            #[inline]
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                use std::mem::transmute;
                <$other_type as ::serde::Deserialize<'de>>::deserialize(deserializer)
                    .map(|x| unsafe { transmute(x) })
            }
        }

        impl ::serde::Serialize for $my_type {
            #[inline]
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                use std::mem::transmute;
                // assert that the types are the same size
                let _ = transmute::<$my_type, $other_type>;
                let o: &$other_type = unsafe { transmute(self) };
                <$other_type as ::serde::Serialize>::serialize(o, serializer)
            }
        }
    };
}

macro_rules! impl_hash_via {
    ($my_type:ty, $other_type:ty) => {
        impl ::std::hash::Hash for $my_type {
            #[inline]
            fn hash<H: ::std::hash::Hasher>(&self, state: &mut H) {
                use std::mem::transmute;
                let _ = transmute::<$my_type, $other_type>;
                let o: &$other_type = unsafe { transmute(self) };
                <$other_type as ::std::hash::Hash>::hash(o, state);
            }
        }
    };
}

macro_rules! impl_partial_eq_via {
    ($my_type:ty, $other_type:ty) => {
        impl PartialEq for $my_type {
            #[inline]
            fn eq(&self, rhs: &Self) -> bool {
                use std::mem::transmute;
                let _ = transmute::<$my_type, $other_type>;
                let s: &$other_type = unsafe { transmute(self) };
                let o: &$other_type = unsafe { transmute(rhs) };
                s == o
            }
        }
    };
}
