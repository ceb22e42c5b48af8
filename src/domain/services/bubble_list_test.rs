use super::BubbleList;
use crate::domain::models::Answer;
use crate::domain::models::Citation;
use crate::domain::models::ConversationTurn;

fn turns() -> Vec<ConversationTurn> {
    return vec![
        ConversationTurn::user(1, "What does the policy cover?"),
        ConversationTurn::pending(2),
    ];
}

#[test]
fn it_has_no_cached_lines() {
    let bubble_list = BubbleList::default();

    assert_eq!(bubble_list.cache.len(), 0);
    assert!(bubble_list.is_empty());
}

#[test]
fn it_caches_lines() {
    let mut bubble_list = BubbleList::default();
    bubble_list.set_turns(&turns(), 50);

    assert_eq!(bubble_list.cache.len(), 2);
    assert_eq!(bubble_list.len(), 6);
}

#[test]
fn it_rerenders_turns_that_resolved() {
    let mut turns = turns();
    let mut bubble_list = BubbleList::default();
    bubble_list.set_turns(&turns, 50);

    turns[1].resolve(Answer {
        text: "Coverage includes X.".to_string(),
        sources: vec![Citation::new("policy.pdf", "3.2")],
    });
    bubble_list.set_turns(&turns, 50);

    // Question bubble, then the answer with a blank line, a header and one citation.
    assert_eq!(bubble_list.len(), 3 + 6);
}

#[test]
fn it_clears_the_cache_on_resize() {
    let mut bubble_list = BubbleList::default();
    bubble_list.set_turns(&turns(), 50);
    bubble_list.set_turns(&turns()[..1], 80);

    assert_eq!(bubble_list.cache.len(), 1);
    assert_eq!(bubble_list.len(), 3);
}
