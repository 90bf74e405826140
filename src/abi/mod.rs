use ethers::contract::abigen;

// Read-only surface of MintedTokenCappedCrowdsale used by the report.
abigen!(
    CrowdsaleContract,
    r#"[
        function weiRaised() external view returns (uint256)
        function tokensSold() external view returns (uint256)
        function investorCount() external view returns (uint256)
        event Invested(address investor, uint256 weiAmount, uint256 tokenAmount, uint128 customerId)
    ]"#,
);
