use crate::events::{Attributes, KeyId};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single typed comparison against one attribute of an event.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(deny_unknown_fields))]
pub struct Predicate {
    key: KeyId,
    comparison: Comparison,
}

impl Predicate {
    pub fn new(key: KeyId, comparison: Comparison) -> Self {
        Self { key, comparison }
    }

    pub fn eq_bool(key: KeyId, value: bool) -> Self {
        Self::new(key, Comparison::EqBool(value))
    }

    pub fn eq_string(key: KeyId, value: &str) -> Self {
        Self::new(key, Comparison::EqString(value.to_owned()))
    }

    pub fn eq_int(key: KeyId, value: i64) -> Self {
        Self::new(key, Comparison::EqInt(value))
    }

    pub fn lt_int(key: KeyId, value: i64) -> Self {
        Self::new(key, Comparison::LtInt(value))
    }

    pub fn lte_int(key: KeyId, value: i64) -> Self {
        Self::new(key, Comparison::LteInt(value))
    }

    pub fn gt_int(key: KeyId, value: i64) -> Self {
        Self::new(key, Comparison::GtInt(value))
    }

    pub fn gte_int(key: KeyId, value: i64) -> Self {
        Self::new(key, Comparison::GteInt(value))
    }

    pub fn lt_float(key: KeyId, value: f64) -> Self {
        Self::new(key, Comparison::LtFloat(value))
    }

    pub fn lte_float(key: KeyId, value: f64) -> Self {
        Self::new(key, Comparison::LteFloat(value))
    }

    pub fn gt_float(key: KeyId, value: f64) -> Self {
        Self::new(key, Comparison::GtFloat(value))
    }

    pub fn gte_float(key: KeyId, value: f64) -> Self {
        Self::new(key, Comparison::GteFloat(value))
    }

    #[inline]
    pub fn key(&self) -> KeyId {
        self.key
    }

    #[inline]
    pub fn comparison(&self) -> &Comparison {
        &self.comparison
    }

    /// Replaces the active comparison. The previous one is dropped entirely.
    pub fn set_comparison(&mut self, comparison: Comparison) {
        self.comparison = comparison;
    }

    /// Whether the attribute this predicate targets holds in `attributes`.
    ///
    /// The key is looked up in the mapping of the comparison's value type only; a missing value
    /// never matches, whatever the comparison.
    pub fn evaluate(&self, attributes: &Attributes) -> bool {
        let key = self.key;
        match &self.comparison {
            Comparison::EqBool(expected) => attributes.boolean(key) == Some(*expected),
            Comparison::EqString(expected) => attributes.string(key) == Some(expected.as_str()),
            Comparison::EqInt(expected) => attributes.integer(key) == Some(*expected),
            Comparison::LtInt(b) => ComparisonOperator::LessThan.evaluate(attributes.integer(key), b),
            Comparison::LteInt(b) => {
                ComparisonOperator::LessThanEqual.evaluate(attributes.integer(key), b)
            }
            Comparison::GtInt(b) => {
                ComparisonOperator::GreaterThan.evaluate(attributes.integer(key), b)
            }
            Comparison::GteInt(b) => {
                ComparisonOperator::GreaterThanEqual.evaluate(attributes.integer(key), b)
            }
            Comparison::LtFloat(b) => {
                ComparisonOperator::LessThan.evaluate(attributes.float(key), b)
            }
            Comparison::LteFloat(b) => {
                ComparisonOperator::LessThanEqual.evaluate(attributes.float(key), b)
            }
            Comparison::GtFloat(b) => {
                ComparisonOperator::GreaterThan.evaluate(attributes.float(key), b)
            }
            Comparison::GteFloat(b) => {
                ComparisonOperator::GreaterThanEqual.evaluate(attributes.float(key), b)
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = self.key;
        match &self.comparison {
            Comparison::EqBool(value) => write!(f, "{key} == {value}"),
            Comparison::EqString(value) => write!(f, "{key} == {value:?}"),
            Comparison::EqInt(value) => write!(f, "{key} == {value}"),
            Comparison::LtInt(value) => write!(f, "{key} < {value}"),
            Comparison::LteInt(value) => write!(f, "{key} <= {value}"),
            Comparison::GtInt(value) => write!(f, "{key} > {value}"),
            Comparison::GteInt(value) => write!(f, "{key} >= {value}"),
            Comparison::LtFloat(value) => write!(f, "{key} < {value:?}"),
            Comparison::LteFloat(value) => write!(f, "{key} <= {value:?}"),
            Comparison::GtFloat(value) => write!(f, "{key} > {value:?}"),
            Comparison::GteFloat(value) => write!(f, "{key} >= {value:?}"),
        }
    }
}

/// The comparison a [`Predicate`] applies, together with its typed operand.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "snake_case"))]
pub enum Comparison {
    EqBool(bool),
    EqString(String),
    EqInt(i64),
    LtInt(i64),
    LteInt(i64),
    GtInt(i64),
    GteInt(i64),
    LtFloat(f64),
    LteFloat(f64),
    GtFloat(f64),
    GteFloat(f64),
}

impl Comparison {
    /// The type of attribute value this comparison reads.
    pub fn attribute_kind(&self) -> AttributeKind {
        match self {
            Self::EqBool(_) => AttributeKind::Boolean,
            Self::EqString(_) => AttributeKind::String,
            Self::EqInt(_) | Self::LtInt(_) | Self::LteInt(_) | Self::GtInt(_) | Self::GteInt(_) => {
                AttributeKind::Integer
            }
            Self::LtFloat(_) | Self::LteFloat(_) | Self::GtFloat(_) | Self::GteFloat(_) => {
                AttributeKind::Float
            }
        }
    }

    pub(crate) fn float_operand(&self) -> Option<f64> {
        match self {
            Self::LtFloat(value)
            | Self::LteFloat(value)
            | Self::GtFloat(value)
            | Self::GteFloat(value) => Some(*value),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AttributeKind {
    Boolean,
    Integer,
    Float,
    String,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ComparisonOperator {
    LessThan,
    LessThanEqual,
    GreaterThanEqual,
    GreaterThan,
}

impl ComparisonOperator {
    #[inline]
    fn evaluate<T: PartialOrd>(&self, a: Option<T>, b: &T) -> bool {
        a.is_some_and(|a| self.apply(&a, b))
    }

    #[inline]
    fn apply<T: PartialOrd>(&self, a: &T, b: &T) -> bool {
        match self {
            Self::LessThan => *a < *b,
            Self::LessThanEqual => *a <= *b,
            Self::GreaterThan => *a > *b,
            Self::GreaterThanEqual => *a >= *b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const STATE: KeyId = KeyId(1);
    const OTHER: KeyId = KeyId(2);

    fn integer(value: i64) -> Attributes {
        Attributes::new().with_integer(STATE, value)
    }

    fn float(value: f64) -> Attributes {
        Attributes::new().with_float(STATE, value)
    }

    #[test]
    fn can_match_a_boolean() {
        let attributes = Attributes::new().with_boolean(STATE, true);

        assert!(Predicate::eq_bool(STATE, true).evaluate(&attributes));
        assert!(!Predicate::eq_bool(STATE, false).evaluate(&attributes));
    }

    #[test]
    fn can_match_a_string() {
        let attributes = Attributes::new().with_string(STATE, "wakelock_name");

        assert!(Predicate::eq_string(STATE, "wakelock_name").evaluate(&attributes));
        assert!(!Predicate::eq_string(STATE, "wakelock").evaluate(&attributes));
    }

    #[test]
    fn can_match_an_integer() {
        assert!(Predicate::eq_int(STATE, 3).evaluate(&integer(3)));
        assert!(!Predicate::eq_int(STATE, 3).evaluate(&integer(4)));
    }

    #[test]
    fn can_compare_integers_strictly() {
        let less_than = Predicate::lt_int(STATE, 10);
        assert!(!less_than.evaluate(&integer(11)));
        assert!(!less_than.evaluate(&integer(10)));
        assert!(less_than.evaluate(&integer(9)));

        let greater_than = Predicate::gt_int(STATE, 10);
        assert!(greater_than.evaluate(&integer(11)));
        assert!(!greater_than.evaluate(&integer(10)));
        assert!(!greater_than.evaluate(&integer(9)));
    }

    #[test]
    fn can_compare_integers_inclusively() {
        let less_than_equal = Predicate::lte_int(STATE, 10);
        assert!(!less_than_equal.evaluate(&integer(11)));
        assert!(less_than_equal.evaluate(&integer(10)));
        assert!(less_than_equal.evaluate(&integer(9)));

        let greater_than_equal = Predicate::gte_int(STATE, 10);
        assert!(greater_than_equal.evaluate(&integer(11)));
        assert!(greater_than_equal.evaluate(&integer(10)));
        assert!(!greater_than_equal.evaluate(&integer(9)));
    }

    #[test]
    fn can_compare_floats() {
        let less_than = Predicate::lt_float(STATE, 10.0);
        assert!(!less_than.evaluate(&float(10.1)));
        assert!(!less_than.evaluate(&float(10.0)));
        assert!(less_than.evaluate(&float(9.9)));

        let greater_than = Predicate::gt_float(STATE, 10.0);
        assert!(greater_than.evaluate(&float(10.1)));
        assert!(!greater_than.evaluate(&float(10.0)));
        assert!(!greater_than.evaluate(&float(9.9)));

        let less_than_equal = Predicate::lte_float(STATE, 10.0);
        assert!(less_than_equal.evaluate(&float(10.0)));
        assert!(less_than_equal.evaluate(&float(9.9)));
        assert!(!less_than_equal.evaluate(&float(10.1)));

        let greater_than_equal = Predicate::gte_float(STATE, 10.0);
        assert!(greater_than_equal.evaluate(&float(10.0)));
        assert!(greater_than_equal.evaluate(&float(10.1)));
        assert!(!greater_than_equal.evaluate(&float(9.9)));
    }

    #[test]
    fn return_false_when_comparing_with_nan() {
        assert!(!Predicate::lte_float(STATE, 10.0).evaluate(&float(f64::NAN)));
        assert!(!Predicate::gte_float(STATE, f64::NAN).evaluate(&float(10.0)));
    }

    #[test]
    fn return_false_when_the_value_has_another_type() {
        let attributes = Attributes::new().with_float(STATE, 3.0);

        assert!(!Predicate::eq_int(STATE, 3).evaluate(&attributes));
    }

    #[test]
    fn return_false_when_the_value_is_recorded_under_another_key() {
        let attributes = Attributes::new().with_integer(OTHER, 3);

        assert!(!Predicate::eq_int(STATE, 3).evaluate(&attributes));
    }

    #[test]
    fn replacing_the_comparison_discards_the_previous_one() {
        let mut predicate = Predicate::lte_int(STATE, 10);

        predicate.set_comparison(Comparison::GteInt(10));

        assert_eq!(&Comparison::GteInt(10), predicate.comparison());
        assert!(predicate.evaluate(&integer(11)));
        assert!(!predicate.evaluate(&integer(9)));
    }

    #[test]
    fn can_render_a_predicate() {
        assert_eq!("key#1 < 10", Predicate::lt_int(STATE, 10).to_string());
        assert_eq!("key#1 >= 9.5", Predicate::gte_float(STATE, 9.5).to_string());
        assert_eq!(
            r#"key#1 == "held""#,
            Predicate::eq_string(STATE, "held").to_string()
        );
    }

    #[test]
    fn can_report_the_attribute_kind() {
        assert_eq!(AttributeKind::Boolean, Comparison::EqBool(true).attribute_kind());
        assert_eq!(AttributeKind::Integer, Comparison::LteInt(1).attribute_kind());
        assert_eq!(AttributeKind::Float, Comparison::GtFloat(1.0).attribute_kind());
        assert_eq!(
            AttributeKind::String,
            Comparison::EqString(String::new()).attribute_kind()
        );
    }

    fn comparison() -> impl Strategy<Value = Comparison> {
        prop_oneof![
            any::<bool>().prop_map(Comparison::EqBool),
            "[a-z]{0,8}".prop_map(Comparison::EqString),
            any::<i64>().prop_map(Comparison::EqInt),
            any::<i64>().prop_map(Comparison::LtInt),
            any::<i64>().prop_map(Comparison::LteInt),
            any::<i64>().prop_map(Comparison::GtInt),
            any::<i64>().prop_map(Comparison::GteInt),
            any::<f64>().prop_map(Comparison::LtFloat),
            any::<f64>().prop_map(Comparison::LteFloat),
            any::<f64>().prop_map(Comparison::GtFloat),
            any::<f64>().prop_map(Comparison::GteFloat),
        ]
    }

    proptest! {
        #[test]
        fn absent_key_never_matches(
            comparison in comparison(),
            integer in any::<i64>(),
            float in any::<f64>(),
            boolean in any::<bool>(),
            string in "[a-z]{0,8}",
        ) {
            let attributes = Attributes::new()
                .with_integer(OTHER, integer)
                .with_float(OTHER, float)
                .with_boolean(OTHER, boolean)
                .with_string(OTHER, &string);

            prop_assert!(!Predicate::new(STATE, comparison).evaluate(&attributes));
        }

        #[test]
        fn integer_comparisons_agree_with_ordering(a in any::<i64>(), b in any::<i64>()) {
            let attributes = integer(a);

            prop_assert_eq!(a < b, Predicate::lt_int(STATE, b).evaluate(&attributes));
            prop_assert_eq!(a <= b, Predicate::lte_int(STATE, b).evaluate(&attributes));
            prop_assert_eq!(a > b, Predicate::gt_int(STATE, b).evaluate(&attributes));
            prop_assert_eq!(a >= b, Predicate::gte_int(STATE, b).evaluate(&attributes));
            prop_assert_eq!(a == b, Predicate::eq_int(STATE, b).evaluate(&attributes));
        }
    }
}
