use chrono::{TimeZone, Utc};
use thrift_and_thrive::{
    domain::{
        AddressSnapshot, MAX_PRICE_CENTS, MAX_QUANTITY, NewAddress, NewProduct, ProductCondition,
        PurchaseLineDraft, Quantity, Registration, ReportRange, format_cents, parse_price_cents,
        sanitize_filename,
    },
    error::AppError,
    services::cart_service::totals,
};
use uuid::Uuid;

#[test]
fn report_range_includes_the_whole_end_day() {
    let range = ReportRange::from_query(Some("2024-01-01"), Some("2024-01-31"))
        .expect("valid dates")
        .expect("both bounds given");

    assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    assert_eq!(range.end, Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());

    assert!(range.contains(Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()));
    assert!(range.contains(Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap()));
    assert!(!range.contains(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()));
    assert!(!range.contains(Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap()));
}

#[test]
fn report_range_without_both_bounds_is_empty() {
    assert!(ReportRange::from_query(None, None).unwrap().is_none());
    assert!(ReportRange::from_query(Some("2024-01-01"), None).unwrap().is_none());
    assert!(ReportRange::from_query(None, Some("2024-01-31")).unwrap().is_none());
    assert!(ReportRange::from_query(Some(""), Some("2024-01-31")).unwrap().is_none());
}

#[test]
fn report_range_rejects_malformed_dates() {
    let err = ReportRange::from_query(Some("01/02/2024"), Some("2024-01-31")).unwrap_err();
    assert!(matches!(err, AppError::InvalidDateFormat));
    assert_eq!(err.to_string(), "Invalid date format. Please use YYYY-MM-DD.");

    let err = ReportRange::from_query(Some("2024-01-01"), Some("2024-02-30")).unwrap_err();
    assert!(matches!(err, AppError::InvalidDateFormat));
}

#[test]
fn quantity_must_be_positive() {
    assert_eq!(Quantity::new(3).unwrap().get(), 3);
    assert_eq!(Quantity::one().get(), 1);
    assert!(matches!(Quantity::new(0), Err(AppError::Validation(_))));
    assert!(matches!(Quantity::new(-2), Err(AppError::Validation(_))));
}

#[test]
fn prices_parse_to_cents_and_render_with_two_decimals() {
    assert_eq!(parse_price_cents("20").unwrap(), 2000);
    assert_eq!(parse_price_cents("20.5").unwrap(), 2050);
    assert_eq!(parse_price_cents(" 20.05 ").unwrap(), 2005);
    assert_eq!(parse_price_cents("0").unwrap(), 0);
    assert_eq!(parse_price_cents(".99").unwrap(), 99);

    for bad in ["", "-1", "abc", "1.234", "1.2.3", "."] {
        assert!(parse_price_cents(bad).is_err(), "{bad:?} should be rejected");
    }

    assert_eq!(format_cents(2000), "20.00");
    assert_eq!(format_cents(5), "0.05");
    assert_eq!(format_cents(123_456), "1234.56");
}

#[test]
fn conditions_parse_case_insensitively() {
    assert_eq!("like new".parse::<ProductCondition>().unwrap(), ProductCondition::LikeNew);
    assert_eq!("New".parse::<ProductCondition>().unwrap(), ProductCondition::New);
    assert_eq!(ProductCondition::LikeNew.to_string(), "Like New");
    assert!("broken".parse::<ProductCondition>().is_err());
}

#[test]
fn new_product_enforces_listing_rules() {
    let product = NewProduct::new(
        "  Red Jacket ",
        "Warm",
        2000,
        ProductCondition::Used,
        "jacket.jpg",
    )
    .unwrap();
    assert_eq!(product.name, "Red Jacket");

    assert!(NewProduct::new("", "d", 100, ProductCondition::New, "a.jpg").is_err());
    assert!(NewProduct::new("x", "d", -1, ProductCondition::New, "a.jpg").is_err());
    assert!(NewProduct::new("x", "d", 100, ProductCondition::New, "").is_err());
    let long_name = "n".repeat(101);
    assert!(NewProduct::new(&long_name, "d", 100, ProductCondition::New, "a.jpg").is_err());
}

#[test]
fn new_address_requires_core_fields() {
    let address = NewAddress::new(
        Some("1 Main St"),
        Some("Springfield"),
        Some("IL"),
        Some("62701"),
        Some("USA"),
        Some(""),
        None,
    )
    .unwrap();
    assert_eq!(address.phone_number, None);

    let err = NewAddress::new(
        Some("1 Main St"),
        Some("  "),
        Some("IL"),
        Some("62701"),
        Some("USA"),
        None,
        None,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Please fill all required fields.");
}

#[test]
fn snapshot_renders_one_line_address() {
    let snapshot = AddressSnapshot {
        street: "1 Main St".into(),
        city: "Springfield".into(),
        state: "IL".into(),
        zip_code: "62701".into(),
        country: "USA".into(),
        phone_number: Some("555-0100".into()),
    };
    assert_eq!(snapshot.one_line(), "1 Main St, Springfield, IL, 62701, USA");
}

#[test]
fn purchase_line_rejects_zero_quantity() {
    let id = Uuid::new_v4();
    assert!(PurchaseLineDraft::new(id, "Lamp", 1500, 2).is_ok());
    assert!(matches!(
        PurchaseLineDraft::new(id, "Lamp", 1500, 0),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn registration_normalizes_email_and_checks_confirmation() {
    let reg = Registration::new(" Alice@Example.COM ", "pw", "pw").unwrap();
    assert_eq!(reg.email, "alice@example.com");

    let err = Registration::new("alice@example.com", "pw", "other").unwrap_err();
    assert_eq!(err.to_string(), "Passwords do not match!");
}

#[test]
fn filenames_are_reduced_to_safe_basenames() {
    assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
    assert_eq!(sanitize_filename("C:\\photos\\my jacket.jpg"), "my_jacket.jpg");
    assert_eq!(sanitize_filename("..."), "");
}

#[test]
fn cart_totals_sum_units_and_prices() {
    assert_eq!(totals([(2, 1000), (1, 550)]).unwrap(), (3, 2550));
    assert_eq!(totals(Vec::<(i32, i64)>::new()).unwrap(), (0, 0));
}

#[test]
fn oversized_prices_and_quantities_are_refused() {
    assert!(matches!(
        parse_price_cents("1000000000000"),
        Err(AppError::Validation(_))
    ));
    assert!(parse_price_cents("99999999999999999999").is_err());
    assert_eq!(parse_price_cents("1000000000").unwrap(), MAX_PRICE_CENTS);

    assert!(Quantity::new(MAX_QUANTITY).is_ok());
    assert!(matches!(Quantity::new(MAX_QUANTITY + 1), Err(AppError::Validation(_))));
    let pricey = NewProduct::new("x", "d", MAX_PRICE_CENTS + 1, ProductCondition::New, "a.jpg");
    assert!(pricey.is_err());

    let (items, cents) = totals([(MAX_QUANTITY, MAX_PRICE_CENTS); 3]).unwrap();
    assert_eq!(items, 3 * i64::from(MAX_QUANTITY));
    assert_eq!(cents, 3 * i64::from(MAX_QUANTITY) * MAX_PRICE_CENTS);
}

#[test]
fn cart_totals_report_overflow_instead_of_wrapping() {
    let err = totals([(i32::MAX, i64::MAX / 2)]).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(totals([(1, i64::MAX), (1, 1)]).is_err());
}

#[test]
fn values_longer_than_their_columns_are_refused() {
    let address = NewAddress::new(
        Some("1 Main St"),
        Some("Springfield"),
        Some("IL"),
        Some("62701"),
        Some("USA"),
        Some("+1 (555) 123-4567 ext. 89"),
        None,
    )
    .unwrap();
    assert_eq!(address.phone_number.as_deref(), Some("+1 (555) 123-4567 ext. 89"));

    let err = NewAddress::new(
        Some("1 Main St"),
        Some("Springfield"),
        Some("IL"),
        Some("62701"),
        Some("USA"),
        Some(&"5".repeat(31)),
        None,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Phone number must be at most 30 characters.");

    let err = NewAddress::new(
        Some(&"s".repeat(201)),
        Some("Springfield"),
        Some("IL"),
        Some("62701"),
        Some("USA"),
        None,
        Some(&"l".repeat(51)),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Street must be at most 200 characters.");

    let long_image = format!("{}.jpg", "i".repeat(120));
    let err = NewProduct::new("Lamp", "d", 100, ProductCondition::Used, &long_image).unwrap_err();
    assert_eq!(err.to_string(), "Image file name must be at most 100 characters.");

    let long_email = format!("{}@example.com", "a".repeat(140));
    let err = Registration::new(&long_email, "pw", "pw").unwrap_err();
    assert_eq!(err.to_string(), "Email must be at most 150 characters.");
}
