//! Property-based tests for listener key and change method naming.

use canopy_component::{ListenerKey, change_method_name};
use proptest::prelude::*;

proptest! {
    #[test]
    fn on_keys_lower_case_only_the_first_letter(head in "[A-Z]", tail in "[a-z][a-zA-Z0-9]{0,12}") {
        prop_assume!(!(head == "C" && tail.starts_with("hange")));
        let key = format!("on{head}{tail}");
        let expected = format!("{}{tail}", head.to_lowercase());
        prop_assert_eq!(ListenerKey::parse(&key).unwrap(), ListenerKey::On(expected));
    }

    #[test]
    fn on_change_keys_map_to_change_events(head in "[A-Z]", tail in "[a-zA-Z0-9]{0,12}") {
        let key = format!("onChange{head}{tail}");
        let expected = format!("change:{}{tail}", head.to_lowercase());
        prop_assert_eq!(ListenerKey::parse(&key).unwrap(), ListenerKey::On(expected));
    }

    #[test]
    fn before_and_after_keys_name_methods(head in "[A-Z]", tail in "[a-z]{0,12}") {
        prop_assume!(!(head == "C" && tail.starts_with("hange")));
        let method = format!("{}{tail}", head.to_lowercase());
        prop_assert_eq!(
            ListenerKey::parse(&format!("before{head}{tail}")).unwrap(),
            ListenerKey::Before(method.clone())
        );
        prop_assert_eq!(
            ListenerKey::parse(&format!("after{head}{tail}")).unwrap(),
            ListenerKey::After(method)
        );
    }

    #[test]
    fn change_method_name_keeps_the_tail(name in "[a-z_][a-zA-Z0-9_]{0,16}") {
        let method = change_method_name(&name);
        prop_assert!(method.starts_with("_onChange"));
        let rest = &method["_onChange".len()..];
        prop_assert_eq!(&rest[1..], &name[1..]);
        prop_assert_eq!(rest[..1].to_string(), name[..1].to_uppercase());
    }
}
