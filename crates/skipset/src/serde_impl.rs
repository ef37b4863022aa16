//! A set serializes as its ascending sequence of elements.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use skipset_coin::SeededCoin;

use crate::set::SkipListSet;

impl<T: Serialize, C> Serialize for SkipListSet<T, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// Any sequence is accepted; duplicates collapse and the default coin is used.
impl<'de, T> Deserialize<'de> for SkipListSet<T, SeededCoin>
where
    T: Deserialize<'de> + Ord + Clone,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<T>::deserialize(deserializer)?;
        Ok(SkipListSet::from_collection(values))
    }
}

#[cfg(test)]
mod tests {
    use crate::SkipListSet;

    #[test]
    fn serializes_ascending() {
        let set = SkipListSet::from_collection([3, 1, 2]);
        assert_eq!(serde_json::to_string(&set).unwrap(), "[1,2,3]");
    }

    #[test]
    fn deserializes_unsorted_with_duplicates() {
        let set: SkipListSet<String> = serde_json::from_str(r#"["b","a","b","c"]"#).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.first().map(String::as_str), Ok("a"));
        assert!(set.validate().is_ok());
    }

    #[test]
    fn json_round_trip_matches_default_construction() {
        let original = SkipListSet::from_collection(0..100);
        let json = serde_json::to_string(&original).unwrap();
        let restored: SkipListSet<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, original);
        assert_eq!(restored.stats(), original.stats());
    }

    #[test]
    fn rejects_non_sequence() {
        let result: Result<SkipListSet<i32>, _> = serde_json::from_str(r#"{"a":1}"#);
        assert!(result.is_err());
    }
}
