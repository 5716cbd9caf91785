use rand::{Rng, seq::SliceRandom};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    domain::{NewProduct, ProductCondition, parse_price_cents, sanitize_filename},
    dto::products::{ProductList, SellForm},
    entity::{
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::{AdminUser, AuthUser},
    models::Product,
    state::AppState,
};

const SAMPLE_IMAGES: [&str; 4] = ["sample1.jpg", "sample2.jpg", "sample3.jpg", "sample4.jpg"];

const SAMPLE_WORDS: [&str; 24] = [
    "vintage", "denim", "leather", "wool", "linen", "canvas", "retro", "classic", "cozy",
    "jacket", "scarf", "boots", "lamp", "chair", "vase", "record", "camera", "satchel",
    "sweater", "table", "mirror", "kettle", "blanket", "poster",
];

/// Every product with its seller's email. No paging or ordering options.
pub async fn list_products(state: &AppState) -> AppResult<ProductList> {
    let items = Products::find()
        .find_also_related(Users)
        .order_by_asc(Column::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(product, seller)| Product::from_entity(product, seller.map(|s| s.email)))
        .collect();

    Ok(ProductList { items })
}

/// Validate the sell form, store the image, then record the product.
pub async fn sell_product(state: &AppState, user: &AuthUser, form: SellForm) -> AppResult<Product> {
    let listing_failed =
        || AppError::Validation("Failed to list the product. Please try again.".into());

    let image_bytes = form
        .image_bytes
        .filter(|bytes| !bytes.is_empty())
        .ok_or_else(listing_failed)?;
    let image_name = sanitize_filename(form.image_name.as_deref().unwrap_or_default());
    if image_name.is_empty() {
        return Err(listing_failed());
    }

    let price_cents = parse_price_cents(form.price.as_deref().unwrap_or_default())?;
    let condition: ProductCondition = form.condition.as_deref().unwrap_or_default().parse()?;
    let new_product = NewProduct::new(
        form.name.as_deref().unwrap_or_default(),
        form.description.as_deref().unwrap_or_default(),
        price_cents,
        condition,
        &image_name,
    )?;

    state.uploads.save(&image_name, &image_bytes).await?;
    let product = insert_product(state, user.user_id, new_product).await?;

    tracing::info!(product_id = %product.id, seller_id = %user.user_id, "product listed");
    Ok(product)
}

async fn insert_product(
    state: &AppState,
    seller_id: Uuid,
    product: NewProduct,
) -> AppResult<Product> {
    let model: ProductModel = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(product.name),
        description: Set(product.description),
        price_cents: Set(product.price_cents),
        condition: Set(product.condition.as_str().to_string()),
        rating: Set(0.0),
        image_filename: Set(product.image_filename),
        seller_id: Set(seller_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(Product::from_entity(model, None))
}

/// Build between three and eight random listings owned by the admin.
pub fn sample_products() -> AppResult<Vec<NewProduct>> {
    let mut rng = rand::thread_rng();
    let count = rng.gen_range(3..=8);
    let mut products = Vec::with_capacity(count);
    for _ in 0..count {
        let name = format!("{} {}", capitalized_word(&mut rng), capitalized_word(&mut rng));
        let description = (0..10)
            .map(|_| SAMPLE_WORDS.choose(&mut rng).copied().unwrap_or("item"))
            .collect::<Vec<_>>()
            .join(" ");
        let description = format!("{description}.");
        let price_cents = rng.gen_range(0..=999_i64) * 100;
        let condition = ProductCondition::ALL
            .choose(&mut rng)
            .copied()
            .unwrap_or(ProductCondition::Used);
        let image = SAMPLE_IMAGES.choose(&mut rng).copied().unwrap_or("sample1.jpg");
        products.push(NewProduct::new(
            &name,
            &description,
            price_cents,
            condition,
            &sanitize_filename(image),
        )?);
    }
    Ok(products)
}

fn capitalized_word<R: Rng + ?Sized>(rng: &mut R) -> String {
    let word = SAMPLE_WORDS.choose(rng).copied().unwrap_or("thing");
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub async fn add_sample_products(state: &AppState, admin: &AdminUser) -> AppResult<usize> {
    let products = sample_products()?;
    let count = products.len();
    for product in products {
        insert_product(state, admin.user_id, product).await?;
    }

    tracing::info!(admin_id = %admin.user_id, count, "sample products added");
    Ok(count)
}

/// Delete the whole catalog. Cart lines go with their products; purchase
/// lines keep their copied name and price.
pub async fn delete_all_products(state: &AppState, admin: &AdminUser) -> AppResult<u64> {
    let deleted = Products::delete_many().exec(&state.orm).await?.rows_affected;
    tracing::info!(admin_id = %admin.user_id, deleted, "catalog cleared");
    Ok(deleted)
}
