mod common;

use std::sync::Arc;

use common::{listing, page_of, recipe, TestEnvironment};
use pretty_assertions::assert_eq;
use recipe_browser::client::{FilterField, MockRecipeSource, PageSize, RecipeFilters, RecipeList, RecipeRequest};
use recipe_browser::view::{LoadStatus, ResultOrigin};
use tokio::sync::Notify;

#[tokio::test]
async fn test_mount_renders_single_row_with_placeholders() {
    common::init_test_logging();
    let env = TestEnvironment::new(
        MockRecipeSource::new().with_json(&listing(1, 15), r#"{"data":[{"id":1,"title":"Soup"}]}"#),
    );

    env.table.mount().await;

    assert_eq!(env.source.request_paths(), vec!["/api/recipes?page=1&limit=15"]);
    let state = env.table.snapshot().await;
    assert_eq!(state.recipes().len(), 1);
    assert_eq!(*state.status(), LoadStatus::Loaded);

    let view = env.table.render().await;
    let row = view
        .lines()
        .find(|line| line.contains("Soup"))
        .expect("row for Soup");
    let cells: Vec<&str> = row.split("  ").map(str::trim).filter(|c| !c.is_empty()).collect();
    assert_eq!(cells, vec!["1", "Soup", "Unknown", "☆☆☆☆☆", "N/A min", "N/A"]);
    assert!(view.contains("Page 1"));
}

#[tokio::test]
async fn test_mount_is_only_issued_once() {
    let env = TestEnvironment::new(MockRecipeSource::new().with_list(&listing(1, 15), page_of(1, 3, 3)));

    env.table.mount().await;
    env.table.mount().await;

    assert_eq!(env.source.requests().len(), 1);
}

#[tokio::test]
async fn test_empty_envelope_shows_placeholder() {
    for body in ["{}", r#"{"data": null}"#, r#"{"data": []}"#] {
        let env = TestEnvironment::new(MockRecipeSource::new().with_json(&listing(1, 15), body));
        env.table.mount().await;

        let state = env.table.snapshot().await;
        assert!(state.recipes().is_empty());
        let view = env.table.render().await;
        assert!(view.contains("No recipes found."), "body {}", body);
        assert!(!view.contains("per page"), "pagination hidden for {}", body);
    }
}

#[tokio::test]
async fn test_row_count_matches_response() {
    let env = TestEnvironment::new(MockRecipeSource::new().with_list(&listing(1, 15), page_of(1, 15, 100)));
    env.table.mount().await;

    let view = env.table.render().await;
    let rows = view
        .lines()
        .filter(|line| line.contains("Recipe ") && !line.starts_with("Recipe Collection"))
        .count();
    assert_eq!(rows, 15);
    assert!(view.contains("Page 1 of 7"));
}

#[tokio::test]
async fn test_previous_at_first_page_stays_on_page_one() {
    let env = TestEnvironment::new(MockRecipeSource::new().with_list(&listing(1, 15), page_of(1, 15, 100)));
    env.table.mount().await;

    assert!(!env.table.previous_page().await);

    assert_eq!(env.table.snapshot().await.current_page(), 1);
    assert_eq!(env.source.requests().len(), 1, "no request for a no-op page change");
    assert!(env.table.render().await.contains("Previous (disabled)"));
}

#[tokio::test]
async fn test_next_and_previous_request_plain_listing() {
    let env = TestEnvironment::new(
        MockRecipeSource::new()
            .with_list(&listing(1, 15), page_of(1, 15, 100))
            .with_list(&listing(2, 15), page_of(16, 15, 100)),
    );
    env.table.mount().await;

    assert!(env.table.next_page().await);
    assert_eq!(env.table.snapshot().await.recipes()[0].id, Some(16));

    assert!(env.table.previous_page().await);
    assert_eq!(
        env.source.request_paths(),
        vec![
            "/api/recipes?page=1&limit=15",
            "/api/recipes?page=2&limit=15",
            "/api/recipes?page=1&limit=15",
        ]
    );
}

#[tokio::test]
async fn test_next_stops_at_last_known_page() {
    let env = TestEnvironment::new(
        MockRecipeSource::new()
            .with_list(&listing(1, 15), page_of(1, 15, 20))
            .with_list(&listing(2, 15), page_of(16, 5, 20)),
    );
    env.table.mount().await;
    assert!(env.table.next_page().await);

    assert!(!env.table.next_page().await);
    assert_eq!(env.table.snapshot().await.current_page(), 2);
    assert!(env.table.render().await.contains("Next (disabled)"));
}

#[tokio::test]
async fn test_go_to_page_rejects_zero() {
    let env = TestEnvironment::new(MockRecipeSource::new().with_list(&listing(1, 15), page_of(1, 15, 100)));
    env.table.mount().await;

    assert!(env.table.go_to_page(0).await.is_err());
    assert!(env.table.go_to_page(99).await.is_err());
    assert_eq!(env.table.snapshot().await.current_page(), 1);
}

#[tokio::test]
async fn test_limit_change_requests_listing_with_current_page() {
    let mut filters = RecipeFilters::default();
    filters.set(FilterField::Title, "pie");
    let env = TestEnvironment::new(
        MockRecipeSource::new()
            .with_list(&listing(1, 15), page_of(1, 15, 100))
            .with_list(&listing(2, 15), page_of(16, 15, 100))
            .with_list(&RecipeRequest::Search(filters), page_of(500, 2, 2))
            .with_list(&listing(2, 50), page_of(51, 50, 100)),
    );
    env.table.mount().await;
    env.table.next_page().await;
    env.table.set_filter(FilterField::Title, "pie").await;
    env.table.search().await;

    assert!(env.table.set_page_size(PageSize::Fifty).await);

    let requests = env.source.requests();
    assert_eq!(requests.last(), Some(&listing(2, 50)));
    let state = env.table.snapshot().await;
    assert_eq!(state.origin(), Some(ResultOrigin::Listing { page: 2 }));
    assert_eq!(state.recipes().len(), 50);
    assert_eq!(state.filters().title, "pie", "filters are kept but not applied to the listing");
}

#[tokio::test]
async fn test_same_limit_does_not_reload() {
    let env = TestEnvironment::new(MockRecipeSource::new().with_list(&listing(1, 15), page_of(1, 15, 100)));
    env.table.mount().await;

    assert!(!env.table.set_page_size(PageSize::Fifteen).await);
    assert_eq!(env.source.requests().len(), 1);
}

#[tokio::test]
async fn test_filter_edits_issue_no_request_until_search() {
    let mut filters = RecipeFilters::default();
    filters.set(FilterField::Cuisine, "Italian");
    filters.set(FilterField::Calories, "<=400");

    let env = TestEnvironment::new(
        MockRecipeSource::new()
            .with_list(&listing(1, 15), page_of(1, 15, 100))
            .with_json(&RecipeRequest::Search(filters), r#"[{"id": 900, "title": "Risotto"}]"#),
    );
    env.table.mount().await;

    env.table.set_filter(FilterField::Cuisine, "Italian").await;
    env.table.set_filter(FilterField::Calories, "<=400").await;
    assert_eq!(env.source.requests().len(), 1);

    env.table.search().await;

    assert_eq!(
        env.source.request_paths().last().map(String::as_str),
        Some("/api/recipes/search?cuisine=Italian&calories=%3C%3D400")
    );
    let state = env.table.snapshot().await;
    assert_eq!(state.recipes().len(), 1);
    assert_eq!(state.current_page(), 1);
    assert_eq!(state.origin(), Some(ResultOrigin::Search));
    assert!(env.table.render().await.contains("Showing 1 search results"));
}

#[tokio::test]
async fn test_search_does_not_reset_current_page() {
    let env = TestEnvironment::new(
        MockRecipeSource::new()
            .with_list(&listing(1, 15), page_of(1, 15, 100))
            .with_list(&listing(2, 15), page_of(16, 15, 100))
            .with_list(&RecipeRequest::Search(RecipeFilters::default()), page_of(1, 3, 3)),
    );
    env.table.mount().await;
    env.table.next_page().await;

    env.table.search().await;

    assert_eq!(env.source.request_paths().last().map(String::as_str), Some("/api/recipes/search"));
    assert_eq!(env.table.snapshot().await.current_page(), 2);
}

#[tokio::test]
async fn test_clear_filters_resets_every_field() {
    let env = TestEnvironment::new(MockRecipeSource::new());
    env.table.set_filter(FilterField::Title, "pie").await;
    env.table.set_filter(FilterField::MinRating, "4").await;

    env.table.clear_filters().await;

    assert!(env.table.snapshot().await.filters().is_empty());
    assert!(env.source.requests().is_empty());
}

#[tokio::test]
async fn test_failed_load_keeps_previous_rows_and_shows_error() {
    common::init_test_logging();
    let env = TestEnvironment::new(
        MockRecipeSource::new()
            .with_list(&listing(1, 15), page_of(1, 15, 100))
            .with_error(&listing(2, 15), "connection refused"),
    );
    env.table.mount().await;

    env.table.next_page().await;

    let state = env.table.snapshot().await;
    assert!(!state.is_loading());
    assert_eq!(*state.status(), LoadStatus::Failed("connection refused".to_string()));
    assert_eq!(state.recipes()[0].id, Some(1));
    let view = env.table.render().await;
    assert!(view.contains("Could not load recipes: connection refused"));
    assert!(view.contains("Recipe 1"));
}

#[tokio::test]
async fn test_failed_first_load_shows_empty_state() {
    let env = TestEnvironment::new(MockRecipeSource::new().with_json(&listing(1, 15), "<html>oops</html>"));
    env.table.mount().await;

    let state = env.table.snapshot().await;
    assert!(matches!(state.status(), LoadStatus::Failed(_)));
    assert!(env.table.render().await.contains("No recipes found."));
}

#[tokio::test]
async fn test_stale_response_does_not_overwrite_newer_page() {
    common::init_test_logging();
    let slow_gate = Arc::new(Notify::new());
    let env = TestEnvironment::new(
        MockRecipeSource::new()
            .with_list(&listing(1, 15), page_of(1, 15, 100))
            .with_list(&listing(2, 15), page_of(16, 15, 100))
            .with_gate(&listing(2, 15), slow_gate.clone())
            .with_list(&listing(3, 15), page_of(31, 15, 100)),
    );
    env.table.mount().await;

    let slow = tokio::spawn({
        let table = env.table.clone();
        async move { table.next_page().await }
    });
    env.wait_for_requests(2).await;
    assert!(env.table.snapshot().await.is_loading());

    env.table.next_page().await;
    assert_eq!(env.table.snapshot().await.recipes()[0].id, Some(31));

    slow_gate.notify_one();
    slow.await.unwrap();

    let state = env.table.snapshot().await;
    assert_eq!(state.current_page(), 3);
    assert_eq!(state.recipes()[0].id, Some(31), "page 2 arrived late and was dropped");
    assert_eq!(*state.status(), LoadStatus::Loaded);
}

#[tokio::test]
async fn test_loading_flag_waits_for_latest_request() {
    let slow_gate = Arc::new(Notify::new());
    let env = TestEnvironment::new(
        MockRecipeSource::new()
            .with_list(&listing(1, 15), page_of(1, 15, 100))
            .with_list(&listing(2, 15), page_of(16, 15, 100))
            .with_list(&listing(3, 15), page_of(31, 15, 100))
            .with_gate(&listing(3, 15), slow_gate.clone()),
    );
    env.table.mount().await;
    env.table.next_page().await;

    let latest = tokio::spawn({
        let table = env.table.clone();
        async move { table.next_page().await }
    });
    env.wait_for_requests(3).await;

    let view = env.table.render().await;
    assert!(view.contains("Loading recipes..."));
    assert!(!view.contains("Recipe 16"), "table is suppressed while loading");
    assert!(view.contains("Showing 15 recipes from page 2"));

    slow_gate.notify_one();
    latest.await.unwrap();
    assert!(!env.table.snapshot().await.is_loading());
}

#[tokio::test]
async fn test_row_click_opens_drawer_without_request() {
    let mut soup = recipe(1, "Tomato Soup");
    soup.cuisine = Some("Italian".to_string());
    soup.rating = Some(4.6);
    soup.prep_time = Some(10.0);
    soup.cook_time = Some(35.0);
    soup.total_time = Some(45.0);
    soup.description = Some("Rich and simple.".to_string());
    soup.nutrients = serde_json::from_str(r#"{"calories": "389 kcal", "proteinContent": "10g"}"#).unwrap();

    let env = TestEnvironment::new(
        MockRecipeSource::new().with_list(&listing(1, 15), RecipeList::from(vec![soup, recipe(2, "Bread")])),
    );
    env.table.mount().await;

    env.table.select_row(1).await.unwrap();

    assert_eq!(env.source.requests().len(), 1);
    let view = env.table.render().await;
    assert!(view.contains("=== Tomato Soup ==="));
    assert!(view.contains("Description: Rich and simple."));
    assert!(view.contains("Total Time: 45 min"));
    assert!(view.contains("  Prep Time: 10 min"));
    assert!(view.contains("Nutrition Facts"));
    assert!(view.contains("Protein Content  10g"));
    assert!(view.contains("★★★★☆"));
}

#[tokio::test]
async fn test_select_by_id_and_close() {
    let env = TestEnvironment::new(MockRecipeSource::new().with_list(&listing(1, 15), page_of(1, 3, 3)));
    env.table.mount().await;

    env.table.select_recipe(2).await.unwrap();
    assert_eq!(env.table.snapshot().await.selected().and_then(|r| r.id), Some(2));
    assert!(!env.table.render().await.contains("Nutrition Facts"));

    env.table.close_details().await;
    assert!(env.table.snapshot().await.selected().is_none());
    assert!(!env.table.render().await.contains("=== Recipe 2 ==="));
}

#[tokio::test]
async fn test_select_unknown_row_or_id_fails() {
    let env = TestEnvironment::new(MockRecipeSource::new().with_list(&listing(1, 15), page_of(1, 3, 3)));
    env.table.mount().await;

    assert!(env.table.select_row(0).await.is_err());
    assert!(env.table.select_row(4).await.is_err());
    assert!(env.table.select_recipe(42).await.is_err());
    assert!(env.table.snapshot().await.selected().is_none());
}

#[tokio::test]
async fn test_initial_page_size_comes_from_construction() {
    let env = TestEnvironment::with_page_size(
        MockRecipeSource::new().with_list(&listing(1, 25), page_of(1, 25, 30)),
        PageSize::TwentyFive,
    );
    env.table.mount().await;

    assert_eq!(env.source.request_paths(), vec!["/api/recipes?page=1&limit=25"]);
    assert!(env.table.render().await.contains("Page 1 of 2"));
}

#[tokio::test]
async fn test_aborted_gesture_still_completes_its_load() {
    common::init_test_logging();
    let gate = Arc::new(Notify::new());
    let env = TestEnvironment::new(
        MockRecipeSource::new()
            .with_list(&listing(1, 15), page_of(1, 15, 100))
            .with_list(&listing(2, 15), page_of(16, 15, 100))
            .with_gate(&listing(2, 15), gate.clone()),
    );
    env.table.mount().await;

    let gesture = tokio::spawn({
        let table = env.table.clone();
        async move { table.next_page().await }
    });
    env.wait_for_requests(2).await;
    gesture.abort();
    assert!(gesture.await.unwrap_err().is_cancelled());

    gate.notify_one();

    let state = env.wait_until(|state| !state.is_loading()).await;
    assert_eq!(*state.status(), LoadStatus::Loaded);
    assert_eq!(state.current_page(), 2);
    assert_eq!(state.recipes()[0].id, Some(16));
}

#[tokio::test]
async fn test_stale_failure_does_not_replace_newer_rows() {
    common::init_test_logging();
    let gate = Arc::new(Notify::new());
    let env = TestEnvironment::new(
        MockRecipeSource::new()
            .with_list(&listing(1, 15), page_of(1, 15, 100))
            .with_error(&listing(2, 15), "upstream timed out")
            .with_gate(&listing(2, 15), gate.clone())
            .with_list(&listing(3, 15), page_of(31, 15, 100)),
    );
    env.table.mount().await;

    let slow = tokio::spawn({
        let table = env.table.clone();
        async move { table.next_page().await }
    });
    env.wait_for_requests(2).await;
    env.table.next_page().await;

    gate.notify_one();
    slow.await.unwrap();

    let state = env.table.snapshot().await;
    assert_eq!(*state.status(), LoadStatus::Loaded);
    assert_eq!(state.recipes()[0].id, Some(31));
    assert!(!env.table.render().await.contains("Could not load recipes"));
}

#[tokio::test]
async fn test_next_page_before_mount_loads_first_page() {
    let env = TestEnvironment::new(MockRecipeSource::new().with_list(&listing(1, 15), page_of(1, 15, 100)));

    assert!(!env.table.next_page().await);

    assert_eq!(env.source.request_paths(), vec!["/api/recipes?page=1&limit=15"]);
    let state = env.table.snapshot().await;
    assert_eq!(state.current_page(), 1);
    assert_eq!(*state.status(), LoadStatus::Loaded);
    assert!(env.table.render().await.contains("Page 1 of 7"));
}

#[tokio::test]
async fn test_no_op_gestures_before_mount_still_load() {
    let env = TestEnvironment::new(MockRecipeSource::new().with_list(&listing(1, 15), page_of(1, 15, 100)));

    assert!(!env.table.previous_page().await);
    assert_eq!(env.source.requests().len(), 1);

    let env = TestEnvironment::new(MockRecipeSource::new().with_list(&listing(1, 15), page_of(1, 15, 100)));
    assert!(!env.table.go_to_page(1).await.unwrap());
    assert_eq!(env.source.requests().len(), 1);

    let env = TestEnvironment::new(MockRecipeSource::new().with_list(&listing(1, 15), page_of(1, 15, 100)));
    assert!(!env.table.set_page_size(PageSize::Fifteen).await);
    assert_eq!(env.source.request_paths(), vec!["/api/recipes?page=1&limit=15"]);
    assert_eq!(*env.table.snapshot().await.status(), LoadStatus::Loaded);
}
