use crate::domain::repository::ShoppingListSource;
use crate::error::ApiServiceError;

/// Render the aggregated shopping list as plain text, one
/// `{name} ({unit}) - {total}` line per distinct ingredient.
pub struct DownloadShoppingListUseCase<S: ShoppingListSource> {
    pub source: S,
}

impl<S: ShoppingListSource> DownloadShoppingListUseCase<S> {
    pub async fn execute(&self, user_id: i64) -> Result<String, ApiServiceError> {
        let items = self.source.aggregate(user_id).await?;
        let mut out = String::from("Shopping list:\n\n");
        for item in items {
            out.push_str(&format!(
                "{} ({}) - {}\n",
                item.name, item.measurement_unit, item.total_amount
            ));
        }
        Ok(out)
    }
}
