use std::{cell::RefCell, rc::Rc, str::from_utf8};

use fungible_ledger::{
    account::{AccountId, Amount},
    bin_utils::Service,
    ledger::{Ledger, LedgerError, LedgerEvent},
    processor::{
        LedgerProcessError, in_memory_processor::InMemoryLedgerProcessor,
        shared_ledger::SharedLedger,
    },
};

const TEST_FILE: &str = include_str!("operations.csv");

const ADMIN: AccountId = AccountId::repeat_byte(0xad);
const ALICE: AccountId = AccountId::repeat_byte(0xa1);
const BOB: AccountId = AccountId::repeat_byte(0xb0);
const CAROL: AccountId = AccountId::repeat_byte(0xc0);
const DAVE: AccountId = AccountId::repeat_byte(0xd0);

type Recorded<T> = Rc<RefCell<Vec<T>>>;

fn run_service<P>(processor: P) -> (String, Vec<(u64, String)>, Vec<LedgerEvent>)
where
    P: fungible_ledger::processor::LedgerProcessor,
{
    let errors: Recorded<(u64, String)> = Rc::default();
    let events: Recorded<LedgerEvent> = Rc::default();
    let mut output = Vec::new();
    let service = Service {
        input: TEST_FILE.as_bytes(),
        output: &mut output,
        processor,
        error_printer: Box::new({
            let errors = errors.clone();
            move |line, err| {
                if let LedgerProcessError::LedgerErr(LedgerError::ArithmeticOverflow) = err {
                    panic!("unexpected overflow at line {line}");
                }
                errors.borrow_mut().push((line, err.to_string()))
            }
        }),
        event_sink: Box::new({
            let events = events.clone();
            move |event| events.borrow_mut().push(event.clone())
        }),
    };
    service.run().unwrap();
    let output = from_utf8(&output).unwrap().to_string();
    let errors = errors.borrow().clone();
    let events = events.borrow().clone();
    (output, errors, events)
}

#[test]
fn process_operations() {
    let processor = InMemoryLedgerProcessor::new(Ledger::new(Amount::from(1234567), ADMIN));
    let (output, errors, events) = run_service(processor);

    // holders are printed in account order
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "account,balance",
            "0xadadadadadadadadadadadadadadadadadadadad,1234547",
            "0xb0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0,16",
            "0xd0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0,4",
        ]
    );

    assert_eq!(
        errors,
        vec![
            (3, "Insufficient balance: have 0, need 10".to_string()),
            (7, "Insufficient allowance: have 4, need 5".to_string()),
            (11, "Field `amount` is required for Transfer".to_string()),
        ]
    );

    // genesis plus one event per applied operation
    assert_eq!(events.len(), 8);
    assert_eq!(
        events[0],
        LedgerEvent::Transfer {
            from: AccountId::NULL,
            to: ADMIN,
            value: Amount::from(1234567),
            operator: ADMIN,
        }
    );
    assert_eq!(
        events[5],
        LedgerEvent::Transfer {
            from: BOB,
            to: DAVE,
            value: Amount::from(4),
            operator: CAROL,
        }
    );
    assert_eq!(
        events[7],
        LedgerEvent::Transfer {
            from: ADMIN,
            to: BOB,
            value: Amount::from(10),
            operator: ALICE,
        }
    );
}

#[test]
fn shared_ledger_matches_in_memory() {
    let shared = SharedLedger::new(Ledger::new(Amount::from(1234567), ADMIN));
    let (output, errors, events) = run_service(shared.clone());
    let (expected_output, expected_errors, expected_events) = run_service(
        InMemoryLedgerProcessor::new(Ledger::new(Amount::from(1234567), ADMIN)),
    );
    assert_eq!(output, expected_output);
    assert_eq!(errors, expected_errors);
    assert_eq!(events, expected_events);

    assert_eq!(shared.allowance(ADMIN, ALICE), Amount::zero());
    assert_eq!(shared.allowance(BOB, CAROL), Amount::zero());
    assert_eq!(shared.total_supply(), Amount::from(1234567));
}

#[test]
fn malformed_row_stops_the_run() {
    let mut output = Vec::new();
    let service = Service {
        input: "type,caller,from,to,spender,amount\nburn,0x00,,,,1\n".as_bytes(),
        output: &mut output,
        processor: InMemoryLedgerProcessor::new(Ledger::new(Amount::from(1), ADMIN)),
        error_printer: Box::new(|_, _| {}),
        event_sink: Box::new(|_| {}),
    };
    let err = service.run().unwrap_err();
    assert_eq!(err.to_string(), "Malformed operation at line 2");
}
