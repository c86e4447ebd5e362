/// Typed position into an arena of `$t`, serialized as a bare number.
///
/// Indices arriving from a solver response or a problem file are not trusted:
/// `lookup` is the checked access, plain indexing is for indices the crate
/// produced itself.
#[macro_export]
macro_rules! define_index_newtype {
    ($name:ident, $t:ident) => {
        #[derive(
            serde::Serialize,
            serde::Deserialize,
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Default,
        )]
        #[serde(transparent)]
        pub struct $name(usize);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl $name {
            pub const fn new(index: usize) -> Self {
                Self(index)
            }

            pub const fn get(&self) -> usize {
                self.0
            }

            /// Index the next element pushed onto `items` will get.
            pub fn next_in(items: &[$t]) -> Self {
                Self(items.len())
            }

            pub fn lookup(self, items: &[$t]) -> Option<&$t> {
                items.get(self.0)
            }

            pub fn enumerate(items: &[$t]) -> impl Iterator<Item = ($name, &$t)> {
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| (Self(index), item))
            }
        }

        impl From<usize> for $name {
            fn from(index: usize) -> Self {
                Self(index)
            }
        }

        impl std::ops::Index<$name> for [$t] {
            type Output = $t;
            fn index(&self, index: $name) -> &Self::Output {
                &self[index.0]
            }
        }

        impl std::ops::IndexMut<$name> for [$t] {
            fn index_mut(&mut self, index: $name) -> &mut Self::Output {
                &mut self[index.0]
            }
        }

        impl std::ops::Index<$name> for Vec<$t> {
            type Output = $t;
            fn index(&self, index: $name) -> &Self::Output {
                &self.as_slice()[index]
            }
        }

        impl std::ops::IndexMut<$name> for Vec<$t> {
            fn index_mut(&mut self, index: $name) -> &mut Self::Output {
                &mut self.as_mut_slice()[index]
            }
        }
    };
}
