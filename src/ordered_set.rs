use crate::error::Result;

/// The operations shared by every tree-backed set in this crate.
///
/// Inserting a key that is present and removing a key that is absent are no-ops; both report
/// whether the set changed.
pub trait OrderedSet {
    /// Inserts a key. Returns `false` and leaves the set unchanged if the key was already present.
    fn insert(&mut self, key: i32) -> bool;

    /// Removes a key. Returns `false` if the key was not present.
    fn remove(&mut self, key: i32) -> bool;

    /// Checks if a key exists in the set.
    fn contains(&self, key: i32) -> bool;

    /// Returns the height of the underlying tree. An empty tree has height 0.
    fn height(&self) -> usize;

    /// Removes every key.
    fn clear(&mut self);

    /// Returns every key in ascending order.
    fn to_sorted_vec(&self) -> Vec<i32>;

    /// Returns the number of keys in the set.
    fn len(&self) -> usize;

    /// Returns `true` if the set is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Walks the whole tree and reports the first structural invariant that does not hold.
    fn validate(&self) -> Result<()>;
}

// Implements `OrderedSet` and the std and serde traits in terms of a set's inherent methods.
macro_rules! impl_ordered_set {
    ($type_name:ident, $iter_name:ident) => {
        impl $crate::ordered_set::OrderedSet for $type_name {
            fn insert(&mut self, key: i32) -> bool {
                $type_name::insert(self, key)
            }

            fn remove(&mut self, key: i32) -> bool {
                $type_name::remove(self, key)
            }

            fn contains(&self, key: i32) -> bool {
                $type_name::contains(self, key)
            }

            fn height(&self) -> usize {
                $type_name::height(self)
            }

            fn clear(&mut self) {
                $type_name::clear(self)
            }

            fn to_sorted_vec(&self) -> Vec<i32> {
                self.iter().collect()
            }

            fn len(&self) -> usize {
                $type_name::len(self)
            }

            fn validate(&self) -> $crate::error::Result<()> {
                $type_name::validate(self)
            }
        }

        impl Default for $type_name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl ::std::fmt::Debug for $type_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                f.debug_set().entries(self.iter()).finish()
            }
        }

        impl PartialEq for $type_name {
            fn eq(&self, other: &$type_name) -> bool {
                self.len() == other.len() && self.iter().eq(other.iter())
            }
        }

        impl Eq for $type_name {}

        impl ::std::iter::FromIterator<i32> for $type_name {
            fn from_iter<I>(iter: I) -> Self
            where
                I: IntoIterator<Item = i32>,
            {
                let mut set = Self::new();
                set.extend(iter);
                set
            }
        }

        impl Extend<i32> for $type_name {
            fn extend<I>(&mut self, iter: I)
            where
                I: IntoIterator<Item = i32>,
            {
                for key in iter {
                    self.insert(key);
                }
            }
        }

        impl<'a> IntoIterator for &'a $type_name {
            type Item = i32;
            type IntoIter = $iter_name<'a>;

            fn into_iter(self) -> Self::IntoIter {
                self.iter()
            }
        }

        impl ::serde::Serialize for $type_name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                use ::serde::ser::SerializeSeq;

                let mut seq = serializer.serialize_seq(Some(self.len()))?;
                for key in self.iter() {
                    seq.serialize_element(&key)?;
                }
                seq.end()
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $type_name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                struct KeysVisitor;

                impl<'de> ::serde::de::Visitor<'de> for KeysVisitor {
                    type Value = $type_name;

                    fn expecting(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                        f.write_str("a sequence of i32 keys")
                    }

                    fn visit_seq<A>(self, mut seq: A) -> ::std::result::Result<Self::Value, A::Error>
                    where
                        A: ::serde::de::SeqAccess<'de>,
                    {
                        let mut set = $type_name::new();
                        while let Some(key) = seq.next_element::<i32>()? {
                            set.insert(key);
                        }
                        Ok(set)
                    }
                }

                deserializer.deserialize_seq(KeysVisitor)
            }
        }
    };
}
