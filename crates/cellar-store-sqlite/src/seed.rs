//! The standard whiskey tasting-note taxonomy, inserted into an empty store.

use cellar_core::note::Tier::{self, Generic, Intermediate, Specific};

/// `(name, parent, tier)` rows in insertion order.
pub const SEED_NOTES: &[(&str, Option<&str>, Tier)] = &[
  ("Fruity", None, Generic),
  ("cooked fruit", Some("Fruity"), Intermediate),
  ("marmalade", Some("cooked fruit"), Specific),
  ("jam", Some("cooked fruit"), Specific),
  ("apple pie", Some("cooked fruit"), Specific),
  ("Berry", Some("Fruity"), Intermediate),
  ("Raspberry", Some("Berry"), Specific),
  ("Blackberry", Some("Berry"), Specific),
  ("Blueberry", Some("Berry"), Specific),
  ("strawberry", Some("Berry"), Specific),
  ("tropical", Some("Fruity"), Intermediate),
  ("Orange", Some("tropical"), Specific),
  ("Lemon", Some("tropical"), Specific),
  ("Orange Peel", Some("tropical"), Specific),
  ("coconut", Some("tropical"), Specific),
  ("banana", Some("tropical"), Specific),
  ("stone fruit", Some("Fruity"), Intermediate),
  ("plum", Some("stone fruit"), Specific),
  ("peach", Some("stone fruit"), Specific),
  ("cherry", Some("stone fruit"), Specific),
  ("apricot", Some("stone fruit"), Specific),
  ("fruit", Some("Fruity"), Intermediate),
  ("raisin", Some("fruit"), Specific),
  ("grape", Some("fruit"), Specific),
  ("fig", Some("fruit"), Specific),
  ("apple", Some("fruit"), Specific),

  ("Spice", None, Generic),
  ("baking spice", Some("Spice"), Intermediate),
  ("Nutmeg", Some("baking spice"), Specific),
  ("clove", Some("baking spice"), Specific),
  ("coriander", Some("baking spice"), Specific),
  ("cinnamon", Some("baking spice"), Specific),
  ("staranise", Some("baking spice"), Specific),
  ("Savory spice", Some("Spice"), Intermediate),
  ("white pepper", Some("Savory spice"), Specific),
  ("spearmint", Some("Savory spice"), Specific),
  ("herbal", Some("Savory spice"), Specific),
  ("fennel", Some("Savory spice"), Specific),
  ("dill", Some("Savory spice"), Specific),
  ("black pepper", Some("Savory spice"), Specific),

  ("Sweet", None, Generic),
  ("vanillas", Some("Sweet"), Intermediate),
  ("vanilla", Some("vanillas"), Specific),
  ("custard", Some("vanillas"), Specific),
  ("creme brulee", Some("vanillas"), Specific),
  ("soda", Some("Sweet"), Intermediate),
  ("cherry soda", Some("soda"), Specific),
  ("creme soda", Some("soda"), Specific),
  ("root beer", Some("soda"), Specific),
  ("cola", Some("soda"), Specific),
  ("Dessert", Some("Sweet"), Intermediate),
  ("brown sugar", Some("Dessert"), Specific),
  ("butterscotch", Some("Dessert"), Specific),
  ("caramel", Some("Dessert"), Specific),
  ("graham cracker", Some("Dessert"), Specific),
  ("honey", Some("Dessert"), Specific),
  ("licorice", Some("Dessert"), Specific),
  ("maple syrup", Some("Dessert"), Specific),
  ("marshmellow", Some("Dessert"), Specific),
  ("molasses", Some("Dessert"), Specific),
  ("toffee", Some("Dessert"), Specific),
  ("chocolates", Some("Sweet"), Intermediate),
  ("bitter chocolate", Some("chocolates"), Specific),
  ("milk chocolate", Some("chocolates"), Specific),
  ("chocolate mocha", Some("chocolates"), Specific),
  ("chocolate milk", Some("chocolates"), Specific),

  ("Grain", None, Generic),
  ("corn", Some("Grain"), Intermediate),
  ("corn", Some("corn"), Specific),
  ("malt", Some("Grain"), Intermediate),
  ("cereal", Some("malt"), Specific),
  ("cocoa", Some("malt"), Specific),
  ("rye", Some("Grain"), Intermediate),
  ("rye", Some("rye"), Specific),
  ("bread", Some("Grain"), Intermediate),
  ("bread", Some("bread"), Specific),
  ("buckwheat pancakes", Some("bread"), Specific),

  ("Wood", None, Generic),
  ("oak", Some("Wood"), Intermediate),
  ("smoky oak", Some("oak"), Specific),
  ("sweet oak", Some("oak"), Specific),
  ("toasted oak", Some("oak"), Specific),
  ("pine", Some("Wood"), Intermediate),
  ("cedar", Some("pine"), Specific),
  ("pine", Some("pine"), Specific),
  ("Nut", Some("Wood"), Intermediate),
  ("almond", Some("Nut"), Specific),
  ("hazelnut", Some("Nut"), Specific),
  ("peanut", Some("Nut"), Specific),
  ("pecan", Some("Nut"), Specific),
  ("walnut", Some("Nut"), Specific),
  ("Earthy", Some("Wood"), Intermediate),
  ("coffee", Some("Earthy"), Specific),
  ("leather", Some("Earthy"), Specific),
  ("tobacco", Some("Earthy"), Specific),
  ("peat", Some("Earthy"), Specific),
  ("smoke", Some("Earthy"), Specific),

  ("Floral", None, Generic),
  ("Floral", Some("Floral"), Intermediate),
  ("Rose", Some("Floral"), Specific),
  ("Heather", Some("Floral"), Specific),
  ("Violet", Some("Floral"), Specific),
];
