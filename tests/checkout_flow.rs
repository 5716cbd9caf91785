mod common;

use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, Set};
use thrift_and_thrive::{
    domain::{NewAddress, Registration},
    entity::{Products, cart_items::ActiveModel as CartActive},
    error::AppError,
    services::{address_service, admin_service, auth_service, cart_service, checkout_service},
};
use uuid::Uuid;

// Alice lists a jacket, Bob buys it; the receipt and history stay intact
// after the product and the delivery address are gone.
#[tokio::test]
async fn bob_buys_alices_jacket() -> anyhow::Result<()> {
    let Some(app) = common::setup().await? else {
        return Ok(());
    };
    let state = &app.state;

    let alice = common::register(state, "alice").await?;
    let bob = common::register(state, "bob").await?;
    let jacket = common::list_product(state, &alice, "Red Jacket", "20.00").await?;
    let address = common::add_address(state, &bob, "1 Main St").await?;

    cart_service::add_to_cart(state, &bob, jacket).await?;
    let duplicate = cart_service::add_to_cart(state, &bob, jacket).await.unwrap_err();
    assert!(matches!(duplicate, AppError::Conflict(_)));
    assert_eq!(duplicate.to_string(), "Item already exists in your cart!");

    let cart = cart_service::cart_summary(state, &bob).await?;
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.total_items, 1);
    assert_eq!(cart.total_price, "20.00");
    assert_eq!(cart.addresses.len(), 1);

    let event_id = checkout_service::confirm_purchase(state, &bob, address).await?;

    let cart = cart_service::cart_summary(state, &bob).await?;
    assert!(cart.items.is_empty());

    let details = checkout_service::purchase_details(state, event_id).await?;
    assert_eq!(details.user_id, bob.user_id);
    assert_eq!(details.address.street, "1 Main St");
    assert_eq!(details.items.len(), 1);
    assert_eq!(details.items[0].product_name, "Red Jacket");
    assert_eq!(details.items[0].quantity, 1);

    Products::delete_by_id(jacket).exec(&state.orm).await?;
    address_service::delete_address(state, &bob, address).await?;

    let details = checkout_service::purchase_details(state, event_id).await?;
    assert_eq!(details.items[0].product_name, "Red Jacket");
    assert_eq!(details.items[0].product_id, None);
    assert_eq!(details.address.one_line(), "1 Main St, Springfield, IL, 62701, USA");

    let history = checkout_service::list_purchase_events(state, &bob).await?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].address_id, None);
    Ok(())
}

#[tokio::test]
async fn checkout_copies_every_line_then_clears_cart() -> anyhow::Result<()> {
    let Some(app) = common::setup().await? else {
        return Ok(());
    };
    let state = &app.state;

    let seller = common::register(state, "seller").await?;
    let buyer = common::register(state, "buyer").await?;
    let address = common::add_address(state, &buyer, "9 Elm Rd").await?;

    let lamp = common::list_product(state, &seller, "Brass Lamp", "15").await?;
    let vase = common::list_product(state, &seller, "Glass Vase", "7.50").await?;
    let chair = common::list_product(state, &seller, "Oak Chair", "42").await?;
    for product in [lamp, vase, chair] {
        cart_service::add_to_cart(state, &buyer, product).await?;
    }
    assert!(cart_service::update_cart_line(state, &buyer, vase, 3).await?);
    assert_eq!(cart_service::remove_cart_line(state, &buyer, chair).await?, 1);

    let cart = cart_service::cart_summary(state, &buyer).await?;
    assert_eq!(cart.total_items, 4);
    assert_eq!(cart.total_price_cents, 1500 + 3 * 750);

    let event_id = checkout_service::confirm_purchase(state, &buyer, address).await?;
    let details = checkout_service::purchase_details(state, event_id).await?;
    let mut bought: Vec<(String, i32)> = details
        .items
        .into_iter()
        .map(|item| (item.product_name, item.quantity))
        .collect();
    bought.sort();
    assert_eq!(
        bought,
        vec![("Brass Lamp".to_string(), 1), ("Glass Vase".to_string(), 3)]
    );

    assert!(cart_service::cart_summary(state, &buyer).await?.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn cart_quantity_updates_are_validated() -> anyhow::Result<()> {
    let Some(app) = common::setup().await? else {
        return Ok(());
    };
    let state = &app.state;

    let seller = common::register(state, "seller").await?;
    let buyer = common::register(state, "buyer").await?;
    let mug = common::list_product(state, &seller, "Enamel Mug", "4").await?;

    assert!(!cart_service::update_cart_line(state, &buyer, mug, 2).await?);

    cart_service::add_to_cart(state, &buyer, mug).await?;
    let err = cart_service::update_cart_line(state, &buyer, mug, 0).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let missing = cart_service::add_to_cart(state, &buyer, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(missing, AppError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn empty_cart_checkout_records_an_event_without_lines() -> anyhow::Result<()> {
    let Some(app) = common::setup().await? else {
        return Ok(());
    };
    let state = &app.state;

    let buyer = common::register(state, "empty").await?;
    let address = common::add_address(state, &buyer, "3 Pine Ave").await?;

    let event_id = checkout_service::confirm_purchase(state, &buyer, address).await?;
    let details = checkout_service::purchase_details(state, event_id).await?;
    assert!(details.items.is_empty());
    Ok(())
}

#[tokio::test]
async fn failed_checkout_leaves_no_event_and_keeps_the_cart() -> anyhow::Result<()> {
    let Some(app) = common::setup().await? else {
        return Ok(());
    };
    let state = &app.state;

    let seller = common::register(state, "seller").await?;
    let buyer = common::register(state, "buyer").await?;
    let address = common::add_address(state, &buyer, "5 Oak Ln").await?;
    let good = common::list_product(state, &seller, "Wool Scarf", "12").await?;
    let bad = common::list_product(state, &seller, "Canvas Tote", "9").await?;

    cart_service::add_to_cart(state, &buyer, good).await?;
    // A corrupt line the purchase step will refuse.
    CartActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(buyer.user_id),
        product_id: Set(bad),
        quantity: Set(0),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let err = checkout_service::confirm_purchase(state, &buyer, address).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    assert!(checkout_service::list_purchase_events(state, &buyer).await?.is_empty());
    let cart = cart_service::cart_summary(state, &buyer).await?;
    assert_eq!(cart.items.len(), 2);
    Ok(())
}

#[tokio::test]
async fn checkout_with_unknown_address_fails_cleanly() -> anyhow::Result<()> {
    let Some(app) = common::setup().await? else {
        return Ok(());
    };
    let state = &app.state;

    let buyer = common::register(state, "lost").await?;
    let err = checkout_service::confirm_purchase(state, &buyer, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(checkout_service::list_purchase_events(state, &buyer).await?.is_empty());

    let missing = checkout_service::purchase_details(state, Uuid::new_v4()).await.unwrap_err();
    assert_eq!(missing.to_string(), "Purchase event not found");
    Ok(())
}

#[tokio::test]
async fn addresses_can_only_be_deleted_by_their_owner() -> anyhow::Result<()> {
    let Some(app) = common::setup().await? else {
        return Ok(());
    };
    let state = &app.state;

    let owner = common::register(state, "owner").await?;
    let other = common::register(state, "other").await?;
    let address = common::add_address(state, &owner, "7 Birch Ct").await?;

    let err = address_service::delete_address(state, &other, address).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    address_service::delete_address(state, &owner, address).await?;
    let err = address_service::delete_address(state, &owner, address).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    Ok(())
}

#[tokio::test]
async fn register_then_login() -> anyhow::Result<()> {
    let Some(app) = common::setup().await? else {
        return Ok(());
    };
    let state = &app.state;

    let email = common::unique_email("carol");
    let registration = Registration::new(&email.to_uppercase(), "pw123", "pw123")?;
    let session = auth_service::register_user(state, registration).await?;
    assert_eq!(session.user.email, email);
    assert!(!session.user.is_admin);

    let again = Registration::new(&email, "pw123", "pw123")?;
    let err = auth_service::register_user(state, again).await.unwrap_err();
    assert_eq!(err.to_string(), "Email already registered!");

    let login = auth_service::login_user(state, &email, "pw123").await?;
    assert_eq!(login.user.id, session.user.id);

    let err = auth_service::login_user(state, &email, "wrong").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid email or password!");
    Ok(())
}

#[tokio::test]
async fn provisioning_a_registered_email_resets_its_password() -> anyhow::Result<()> {
    let Some(app) = common::setup().await? else {
        return Ok(());
    };
    let state = &app.state;

    let email = common::unique_email("squatter");
    let registration = Registration::new(&email, "squatter-pw", "squatter-pw")?;
    auth_service::register_user(state, registration).await?;

    let admin = admin_service::provision_admin(state, &email, "operator-pw").await?;
    assert!(admin.is_admin);

    let err = auth_service::login_user(state, &email, "squatter-pw").await.unwrap_err();
    assert_eq!(err.to_string(), "Invalid email or password!");
    let session = auth_service::login_user(state, &email, "operator-pw").await?;
    assert_eq!(session.user.id, admin.id);
    Ok(())
}

#[tokio::test]
async fn long_phone_numbers_are_stored() -> anyhow::Result<()> {
    let Some(app) = common::setup().await? else {
        return Ok(());
    };
    let state = &app.state;

    let user = common::register(state, "caller").await?;
    let address = NewAddress::new(
        Some("4 Long Rd"),
        Some("Springfield"),
        Some("IL"),
        Some("62701"),
        Some("USA"),
        Some("+1 (555) 123-4567 ext. 89"),
        None,
    )?;
    let saved = address_service::add_address(state, &user, address).await?;
    assert_eq!(saved.phone_number.as_deref(), Some("+1 (555) 123-4567 ext. 89"));
    Ok(())
}
